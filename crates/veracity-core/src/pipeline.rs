//! The document analysis pipeline.

use std::sync::Arc;

use crate::capability::{CitationLookup, SimilarityAnalyzer};
use crate::{AnalysisConfig, AnalysisResult, paraphrase, quotes, references, score};

/// Orchestrates the three sub-analyses over normalized document text.
///
/// Capability handles are injected once at construction and reused across
/// analyses; the pipeline holds no per-document state.
pub struct Analyzer {
    citation: Arc<dyn CitationLookup>,
    similarity: Arc<dyn SimilarityAnalyzer>,
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(
        citation: Arc<dyn CitationLookup>,
        similarity: Arc<dyn SimilarityAnalyzer>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            citation,
            similarity,
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Name of the citation provider, used when persisting records.
    pub fn provider_name(&self) -> &str {
        self.citation.name()
    }

    /// Analyze normalized text into a complete [`AnalysisResult`].
    ///
    /// Never fails: capability failures degrade to empty or partial
    /// sub-results and the score is aggregated from whatever survived.
    /// Reference parsing is local; quote and paraphrase analysis run
    /// concurrently since their external calls are independent.
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        if text.trim().is_empty() {
            return AnalysisResult::default();
        }

        let references = references::parse_references(text);
        let (quotes, paraphrases) = tokio::join!(
            quotes::extract_quotes(text, &self.citation, &self.client, &self.config),
            paraphrase::scan(text, &self.similarity, &self.client, &self.config),
        );

        let score = score::aggregate_score(&quotes, &paraphrases, &references);
        AnalysisResult {
            quotes,
            paraphrases,
            references,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::SimilarityHit;
    use crate::providers::mock::{MockCitation, MockResponse, MockSimilarity};

    fn analyzer(
        citation: MockResponse<Vec<String>>,
        similarity: MockResponse<Vec<SimilarityHit>>,
    ) -> Analyzer {
        Analyzer::new(
            Arc::new(MockCitation::new(citation)),
            Arc::new(MockSimilarity::new(similarity)),
            AnalysisConfig::default(),
        )
    }

    fn one_hit() -> MockResponse<Vec<SimilarityHit>> {
        MockResponse::Sources(vec![SimilarityHit {
            excerpt: "a similar passage".into(),
            sources: vec!["https://example.org/source".into()],
            confidence: 0.9,
        }])
    }

    #[tokio::test]
    async fn empty_text_yields_default_result() {
        let analyzer = analyzer(MockResponse::Sources(vec![]), MockResponse::Sources(vec![]));
        let result = analyzer.analyze("   ").await;
        assert!(result.quotes.is_empty());
        assert!(result.paraphrases.is_empty());
        assert!(result.references.is_empty());
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn no_quotes_no_references_scores_paraphrases_only() {
        let analyzer = analyzer(MockResponse::Sources(vec!["unused".into()]), one_hit());
        let result = analyzer
            .analyze("plain prose without quotation marks or a source list")
            .await;
        assert!(result.quotes.is_empty());
        assert!(result.references.is_empty());
        assert_eq!(result.paraphrases.len(), 1);
        assert_eq!(result.score, 1.5);
    }

    #[tokio::test]
    async fn full_document_combines_all_three_analyses() {
        let text = "Intro. \"a sufficiently long quoted passage appears here\" Body text. \
                    REFERENCES [1] Smith, J. (2020). Title. doi.org/10.1000/xyz [2] no metadata";
        let analyzer = analyzer(
            MockResponse::Sources(vec!["https://example.org/found".into()]),
            one_hit(),
        );
        let result = analyzer.analyze(text).await;

        assert_eq!(result.quotes.len(), 1);
        assert_eq!(result.paraphrases.len(), 1);
        assert_eq!(result.references.len(), 2);
        assert!(result.references[0].is_valid);
        assert!(!result.references[1].is_valid);
        // 2.0 * 1 + 1.5 * 1 + 30 (1/2 valid)
        assert_eq!(result.score, 33.5);
    }

    #[tokio::test]
    async fn degraded_run_still_produces_complete_result() {
        let text = "\"a sufficiently long quoted passage appears here\" \
                    REFERENCES [1] Smith (2020). [2] junk entry";
        let analyzer = analyzer(
            MockResponse::Error("lookup offline".into()),
            MockResponse::Error("similarity offline".into()),
        );
        let result = analyzer.analyze(text).await;

        assert!(result.quotes.is_empty());
        assert!(result.paraphrases.is_empty());
        assert_eq!(result.references.len(), 2);
        assert_eq!(result.score, 30.0);
    }
}
