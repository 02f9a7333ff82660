//! Fixed-window paraphrase scanning.

use std::sync::Arc;
use std::time::Duration;

use crate::capability::SimilarityAnalyzer;
use crate::{AnalysisConfig, ParaphraseMatch};

/// Partition `text` into contiguous non-overlapping windows of `size`
/// characters; the last window may be shorter. Windows split on char
/// boundaries, never inside a code point.
pub fn windows(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut out = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == size {
            out.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Scan `text` for paraphrase candidates, one similarity call per window.
///
/// Windows are analyzed concurrently and results flattened back in window
/// order. A failed window is logged and skipped; matches from other windows
/// are retained.
pub async fn scan(
    text: &str,
    analyzer: &Arc<dyn SimilarityAnalyzer>,
    client: &reqwest::Client,
    config: &AnalysisConfig,
) -> Vec<ParaphraseMatch> {
    let chunks: Vec<String> = windows(text, config.window_size)
        .into_iter()
        .map(String::from)
        .collect();
    if chunks.is_empty() {
        return vec![];
    }

    let timeout = Duration::from_secs(config.lookup_timeout_secs);
    let total = chunks.len();

    let mut join_set = tokio::task::JoinSet::new();
    for (i, chunk) in chunks.into_iter().enumerate() {
        let analyzer = Arc::clone(analyzer);
        let client = client.clone();
        join_set.spawn(async move {
            let result = analyzer.analyze(&chunk, &client, timeout).await;
            (i, result)
        });
    }

    let mut slots: Vec<Vec<ParaphraseMatch>> = (0..total).map(|_| Vec::new()).collect();
    while let Some(joined) = join_set.join_next().await {
        let Ok((i, result)) = joined else {
            continue;
        };
        match result {
            Ok(hits) => {
                slots[i] = hits
                    .into_iter()
                    .map(|hit| ParaphraseMatch {
                        text: hit.excerpt,
                        sources: hit.sources,
                        similarity: hit.confidence.clamp(0.0, 1.0),
                    })
                    .collect();
            }
            Err(e) => {
                tracing::warn!(window = i, error = %e, "similarity analysis failed for window");
            }
        }
    }

    slots.into_iter().flatten().collect()
}
