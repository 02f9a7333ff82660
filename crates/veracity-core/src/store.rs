//! Append-only analysis record store with embedding similarity lookup.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AnalysisResult;

/// Default cosine similarity cutoff for [`RecordStore::find_similar`].
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Stored content preview length, in characters.
const PREVIEW_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A persisted analysis record. Never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub content_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
    /// Provider name → citation strings that provider produced.
    #[serde(default)]
    pub citations: BTreeMap<String, Vec<String>>,
}

/// Input for [`RecordStore::create`]; the store assigns the id and timestamp.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub content: String,
    pub embedding: Option<Vec<f64>>,
    pub citations: BTreeMap<String, Vec<String>>,
}

impl NewRecord {
    /// Build a record from an analysis run, collecting the distinct citation
    /// strings of all matches under `provider`.
    pub fn from_analysis(
        content: &str,
        result: &AnalysisResult,
        provider: &str,
        embedding: Option<Vec<f64>>,
    ) -> Self {
        let mut citations: Vec<String> = Vec::new();
        let sources = result
            .quotes
            .iter()
            .flat_map(|q| q.sources.iter())
            .chain(result.paraphrases.iter().flat_map(|p| p.sources.iter()));
        for source in sources {
            if !citations.contains(source) {
                citations.push(source.clone());
            }
        }

        Self {
            content: content.to_string(),
            embedding,
            citations: BTreeMap::from([(provider.to_string(), citations)]),
        }
    }
}

/// One [`RecordStore::find_similar`] result.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarRecord {
    pub id: String,
    pub similarity: f64,
    pub preview: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collection {
    documents: Vec<Record>,
}

/// JSON-file-backed append-only record store.
///
/// One lock covers the full read-modify-write cycle, so every `create` is
/// serialized against every other `create` and every `find_similar`. IDs are
/// the historical record count plus one; the lock is the sole mechanism
/// keeping them collision-free, not an optimization.
pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    /// Open the store at `path`, creating an empty collection if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            let empty = serde_json::to_string_pretty(&Collection::default())?;
            std::fs::write(&path, empty)?;
        }
        tracing::info!(path = %path.display(), "opened record store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    fn read_collection(&self) -> Result<Collection, StoreError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_collection(&self, collection: &Collection) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(collection)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Append a record and return its assigned id.
    pub fn create(&self, new: NewRecord) -> Result<String, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut collection = self.read_collection()?;
        let id = (collection.documents.len() + 1).to_string();
        collection.documents.push(Record {
            id: id.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            content_preview: preview(&new.content),
            embedding: new.embedding,
            citations: new.citations,
        });
        self.write_collection(&collection)?;
        Ok(id)
    }

    /// Records whose embedding cosine similarity to `embedding` exceeds
    /// `threshold`, most similar first. Records without an embedding are
    /// skipped; ties keep insertion order.
    pub fn find_similar(
        &self,
        embedding: &[f64],
        threshold: f64,
    ) -> Result<Vec<SimilarRecord>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let collection = self.read_collection()?;
        let mut results: Vec<SimilarRecord> = collection
            .documents
            .iter()
            .filter_map(|doc| {
                let stored = doc.embedding.as_ref()?;
                let similarity = cosine_similarity(embedding, stored);
                (similarity > threshold).then(|| SimilarRecord {
                    id: doc.id.clone(),
                    similarity,
                    preview: doc.content_preview.clone(),
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        Ok(results)
    }
}

fn preview(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}

/// Cosine similarity; 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm = norm_a * norm_b;
    if norm == 0.0 { 0.0 } else { dot / norm }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuoteMatch;
    use std::sync::Arc;

    fn temp_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("records.json")).unwrap();
        (dir, store)
    }

    fn with_embedding(embedding: Vec<f64>) -> NewRecord {
        NewRecord {
            content: "stored content".into(),
            embedding: Some(embedding),
            citations: BTreeMap::new(),
        }
    }

    #[test]
    fn ids_are_monotonic_strings() {
        let (_dir, store) = temp_store();
        assert_eq!(store.create(NewRecord::default()).unwrap(), "1");
        assert_eq!(store.create(NewRecord::default()).unwrap(), "2");
        assert_eq!(store.create(NewRecord::default()).unwrap(), "3");
    }

    #[test]
    fn concurrent_creates_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::open(dir.path().join("records.json")).unwrap());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.create(NewRecord::default()).unwrap())
            })
            .collect();

        let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn ids_continue_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        {
            let store = RecordStore::open(&path).unwrap();
            assert_eq!(store.create(NewRecord::default()).unwrap(), "1");
        }
        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.create(NewRecord::default()).unwrap(), "2");
    }

    #[test]
    fn find_similar_orders_by_similarity_and_filters() {
        let (_dir, store) = temp_store();
        store.create(with_embedding(vec![1.0, 0.0])).unwrap();
        store.create(with_embedding(vec![0.9, 0.1])).unwrap();
        store.create(with_embedding(vec![0.0, 1.0])).unwrap();

        let results = store.find_similar(&[1.0, 0.0], 0.5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "1");
        assert!(results[0].similarity > results[1].similarity);
        assert_eq!(results[1].id, "2");
    }

    #[test]
    fn records_without_embeddings_are_skipped() {
        let (_dir, store) = temp_store();
        store.create(NewRecord::default()).unwrap();
        store.create(with_embedding(vec![1.0, 0.0])).unwrap();

        let results = store.find_similar(&[1.0, 0.0], 0.5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "2");
    }

    #[test]
    fn preview_is_truncated_to_200_chars() {
        let (_dir, store) = temp_store();
        let long = "x".repeat(500);
        store
            .create(NewRecord {
                content: long,
                ..Default::default()
            })
            .unwrap();

        let results = store.find_similar(&[], -1.0).unwrap();
        assert!(results.is_empty()); // no embedding stored

        let content = std::fs::read_to_string(store.path.clone()).unwrap();
        let collection: Collection = serde_json::from_str(&content).unwrap();
        assert_eq!(collection.documents[0].content_preview.len(), 200);
    }

    #[test]
    fn cosine_similarity_handles_zero_norm() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[test]
    fn from_analysis_collects_distinct_citations() {
        let result = AnalysisResult {
            quotes: vec![
                QuoteMatch {
                    text: "q1".into(),
                    sources: vec!["a".into(), "b".into()],
                },
                QuoteMatch {
                    text: "q2".into(),
                    sources: vec!["a".into()],
                },
            ],
            paraphrases: vec![crate::ParaphraseMatch {
                text: "p".into(),
                sources: vec!["c".into()],
                similarity: 0.9,
            }],
            references: vec![],
            score: 7.0,
        };

        let record = NewRecord::from_analysis("content text", &result, "cohere", None);
        assert_eq!(
            record.citations.get("cohere").unwrap(),
            &vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
