//! Quoted-span detection and citation lookup.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::capability::CitationLookup;
use crate::{AnalysisConfig, QuoteMatch};

/// Spans delimited by a matched pair of quotation marks, straight or curly,
/// single- or double-style.
static QUOTED_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "\"([^\"]*)\"",
        "|'([^']*)'",
        "|\u{201C}([^\u{201D}]*)\u{201D}",
        "|\u{2018}([^\u{2019}]*)\u{2019}",
    ))
    .unwrap()
});

/// Find unique quote candidates longer than `min_len` characters, in order of
/// first occurrence. De-duplication happens here, before any lookup is
/// issued, so a repeated phrase costs exactly one external call.
pub fn find_quote_candidates(text: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for caps in QUOTED_SPAN.captures_iter(text) {
        let span = (1..=4)
            .filter_map(|i| caps.get(i))
            .map(|m| m.as_str())
            .next()
            .unwrap_or("");
        if span.chars().count() <= min_len {
            continue;
        }
        if seen.insert(span.to_string()) {
            candidates.push(span.to_string());
        }
    }
    candidates
}

/// Extract quote matches from `text`, one citation lookup per unique
/// candidate.
///
/// Lookups run concurrently; results are slotted back into candidate order
/// before returning. A failed lookup is logged and its candidate skipped —
/// it never aborts the remaining candidates.
pub async fn extract_quotes(
    text: &str,
    lookup: &Arc<dyn CitationLookup>,
    client: &reqwest::Client,
    config: &AnalysisConfig,
) -> Vec<QuoteMatch> {
    let candidates = find_quote_candidates(text, config.min_quote_len);
    if candidates.is_empty() {
        return vec![];
    }

    let timeout = Duration::from_secs(config.lookup_timeout_secs);
    let total = candidates.len();

    let mut join_set = tokio::task::JoinSet::new();
    for (i, candidate) in candidates.into_iter().enumerate() {
        let lookup = Arc::clone(lookup);
        let client = client.clone();
        join_set.spawn(async move {
            let result = lookup.lookup(&candidate, &client, timeout).await;
            (i, candidate, result)
        });
    }

    let mut slots: Vec<Option<QuoteMatch>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let Ok((i, candidate, result)) = joined else {
            continue;
        };
        match result {
            Ok(sources) if !sources.is_empty() => {
                let mut sources = sources;
                sources.truncate(config.max_sources_per_quote);
                slots[i] = Some(QuoteMatch {
                    text: candidate,
                    sources,
                });
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "citation lookup failed, skipping candidate");
            }
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::{MockCitation, MockResponse};

    const LONG_A: &str = "the quick brown fox jumps over the lazy dog";
    const LONG_B: &str = "a completely different quoted passage here";

    #[test]
    fn finds_straight_and_curly_quotes() {
        let text = format!("He said \"{LONG_A}\" and then \u{201C}{LONG_B}\u{201D}.");
        let candidates = find_quote_candidates(&text, 20);
        assert_eq!(candidates, vec![LONG_A.to_string(), LONG_B.to_string()]);
    }

    #[test]
    fn short_phrases_are_discarded() {
        let candidates = find_quote_candidates("\"short\" and 'also short'", 20);
        assert!(candidates.is_empty());
    }

    #[test]
    fn boundary_length_is_discarded() {
        let twenty = "x".repeat(20);
        let twenty_one = "y".repeat(21);
        let text = format!("\"{twenty}\" \"{twenty_one}\"");
        assert_eq!(find_quote_candidates(&text, 20), vec![twenty_one]);
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let text = format!("\"{LONG_A}\" middle \"{LONG_A}\"");
        assert_eq!(find_quote_candidates(&text, 20).len(), 1);
    }

    #[tokio::test]
    async fn duplicate_phrase_issues_one_lookup() {
        let text = format!("\"{LONG_A}\" twice: \"{LONG_A}\"");
        let mock = Arc::new(MockCitation::new(MockResponse::Sources(vec![
            "https://example.org/a".into(),
        ])));
        let lookup: Arc<dyn CitationLookup> = mock.clone();
        let client = reqwest::Client::new();
        let quotes =
            extract_quotes(&text, &lookup, &client, &AnalysisConfig::default()).await;
        assert_eq!(mock.call_count(), 1);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, LONG_A);
    }

    #[tokio::test]
    async fn lookup_failure_is_isolated() {
        let text = format!("\"{LONG_A}\" and \"{LONG_B}\"");
        let mock = Arc::new(MockCitation::with_sequence(vec![
            MockResponse::Error("provider down".into()),
            MockResponse::Sources(vec!["https://example.org/b".into()]),
        ]));
        let lookup: Arc<dyn CitationLookup> = mock;
        let client = reqwest::Client::new();
        let quotes =
            extract_quotes(&text, &lookup, &client, &AnalysisConfig::default()).await;
        // One candidate failed and was skipped, the other survived.
        assert_eq!(quotes.len(), 1);
    }

    #[tokio::test]
    async fn unsourced_candidates_are_omitted() {
        let text = format!("\"{LONG_A}\"");
        let lookup: Arc<dyn CitationLookup> =
            Arc::new(MockCitation::new(MockResponse::Sources(vec![])));
        let client = reqwest::Client::new();
        let quotes =
            extract_quotes(&text, &lookup, &client, &AnalysisConfig::default()).await;
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn sources_are_capped_at_three() {
        let text = format!("\"{LONG_A}\"");
        let lookup: Arc<dyn CitationLookup> = Arc::new(MockCitation::new(MockResponse::Sources(
            vec!["s1".into(), "s2".into(), "s3".into(), "s4".into(), "s5".into()],
        )));
        let client = reqwest::Client::new();
        let quotes =
            extract_quotes(&text, &lookup, &client, &AnalysisConfig::default()).await;
        assert_eq!(quotes[0].sources, vec!["s1", "s2", "s3"]);
    }

    #[tokio::test]
    async fn results_follow_candidate_order() {
        let text = format!("\"{LONG_A}\" then \"{LONG_B}\"");
        // The first candidate answers slowly; order must still hold.
        let mock = MockCitation::new(MockResponse::Sources(vec!["src".into()]))
            .with_delay(Duration::from_millis(20));
        let lookup: Arc<dyn CitationLookup> = Arc::new(mock);
        let client = reqwest::Client::new();
        let quotes =
            extract_quotes(&text, &lookup, &client, &AnalysisConfig::default()).await;
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text, LONG_A);
        assert_eq!(quotes[1].text, LONG_B);
    }
}
