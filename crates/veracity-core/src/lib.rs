use serde::{Deserialize, Serialize};

pub mod capability;
pub mod config_file;
pub mod paraphrase;
pub mod pipeline;
pub mod providers;
pub mod quotes;
pub mod references;
pub mod score;
pub mod store;

// Re-export for convenience
pub use capability::{CapabilityError, CitationLookup, SimilarityAnalyzer, SimilarityHit};
pub use pipeline::Analyzer;
pub use score::aggregate_score;
pub use store::{NewRecord, Record, RecordStore, SimilarRecord, StoreError};

/// A verbatim quoted span with attributed external sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteMatch {
    pub text: String,
    /// Source identifiers in capability relevance order, capped at 3.
    pub sources: Vec<String>,
}

/// A text window flagged as semantically similar to an external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParaphraseMatch {
    pub text: String,
    pub sources: Vec<String>,
    /// Capability-reported confidence, clamped to [0, 1].
    pub similarity: f64,
}

/// One parsed item from a document's bibliography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub raw_text: String,
    /// Structural validity: the entry carries a DOI, URL, ISBN, or
    /// parenthesized year. Says nothing about whether the work exists.
    pub is_valid: bool,
}

/// The complete output of one document analysis.
///
/// Created once per run and never mutated afterwards; every field defaults to
/// empty so a fully degraded run still yields a presentable result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub quotes: Vec<QuoteMatch>,
    pub paraphrases: Vec<ParaphraseMatch>,
    pub references: Vec<ReferenceEntry>,
    /// Originality score in [0, 100].
    pub score: f64,
}

/// Tunables for a document analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Quote candidates at or below this length are discarded as noise.
    pub min_quote_len: usize,
    /// Paraphrase window size in characters; the last window may be shorter.
    pub window_size: usize,
    /// Sources kept per quote match, in capability relevance order.
    pub max_sources_per_quote: usize,
    /// Per-call timeout for external capability invocations.
    pub lookup_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_quote_len: 20,
            window_size: 1000,
            max_sources_per_quote: 3,
            lookup_timeout_secs: 30,
        }
    }
}
