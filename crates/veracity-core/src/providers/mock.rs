//! Mock capability providers for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::capability::{
    CapabilityError, CapabilityFuture, CitationLookup, SimilarityAnalyzer, SimilarityHit,
};

/// A configurable canned response.
#[derive(Clone, Debug)]
pub enum MockResponse<T> {
    /// Return this payload.
    Sources(T),
    /// Simulate a provider failure.
    Error(String),
}

/// A hand-rolled mock provider returning canned responses.
///
/// Supports a fixed response (used for every call) or a sequence of
/// responses (one per call, repeating the last when exhausted), optional
/// per-call latency, and call counting.
pub struct MockProvider<T: Clone> {
    /// Each call pops the next response; the fallback repeats when empty.
    responses: Mutex<Vec<MockResponse<T>>>,
    fallback: MockResponse<T>,
    delay: Option<Duration>,
    call_count: AtomicUsize,
}

/// Mock implementing [`CitationLookup`].
pub type MockCitation = MockProvider<Vec<String>>;

/// Mock implementing [`SimilarityAnalyzer`].
pub type MockSimilarity = MockProvider<Vec<SimilarityHit>>;

impl<T: Clone> MockProvider<T> {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse<T>) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(mut responses: Vec<MockResponse<T>>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // Reverse so we can pop() from the front cheaply.
        responses.reverse();
        let fallback = responses.first().cloned().unwrap();
        Self {
            responses: Mutex::new(responses),
            fallback,
            delay: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Set simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many calls this mock has served.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse<T> {
        let mut seq = self.responses.lock().unwrap();
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }

    fn serve(&self) -> (Option<Duration>, Result<T, CapabilityError>) {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let result = match self.next_response() {
            MockResponse::Sources(payload) => Ok(payload),
            MockResponse::Error(msg) => Err(CapabilityError::Http(msg)),
        };
        (self.delay, result)
    }
}

impl CitationLookup for MockCitation {
    fn name(&self) -> &str {
        "mock"
    }

    fn lookup<'a>(
        &'a self,
        _query: &'a str,
        _client: &'a reqwest::Client,
        _timeout: Duration,
    ) -> CapabilityFuture<'a, Vec<String>> {
        let (delay, result) = self.serve();
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            result
        })
    }
}

impl SimilarityAnalyzer for MockSimilarity {
    fn name(&self) -> &str {
        "mock"
    }

    fn analyze<'a>(
        &'a self,
        _window: &'a str,
        _client: &'a reqwest::Client,
        _timeout: Duration,
    ) -> CapabilityFuture<'a, Vec<SimilarityHit>> {
        let (delay, result) = self.serve();
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            result
        })
    }
}
