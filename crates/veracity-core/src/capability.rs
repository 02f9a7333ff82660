//! Abstract contracts for the external capabilities the pipeline consumes.
//!
//! Concrete providers are injected at construction time so the pipeline can
//! be exercised with test doubles.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

/// Boxed future returned by capability calls.
pub type CapabilityFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, CapabilityError>> + Send + 'a>>;

#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("request error: {0}")]
    Http(String),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Looks up external sources for a verbatim quote.
///
/// Failures are isolated per call by the caller; one bad lookup never aborts
/// the surrounding analysis.
pub trait CitationLookup: Send + Sync {
    /// Provider name used in logs and the persisted citations mapping.
    fn name(&self) -> &str;

    /// Return source identifiers (URLs/titles) for the quoted text, ordered
    /// by the provider's own relevance. Empty means no attribution found.
    fn lookup<'a>(
        &'a self,
        query: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> CapabilityFuture<'a, Vec<String>>;
}

/// One semantically similar span reported for a text window.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityHit {
    pub excerpt: String,
    pub sources: Vec<String>,
    /// Provider confidence in [0, 1].
    pub confidence: f64,
}

/// Flags text windows that paraphrase external sources.
pub trait SimilarityAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    /// Analyze one window; may return no hits.
    fn analyze<'a>(
        &'a self,
        window: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> CapabilityFuture<'a, Vec<SimilarityHit>>;
}
