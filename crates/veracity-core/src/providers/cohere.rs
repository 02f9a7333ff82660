//! Cohere chat-based provider implementing both capability contracts.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Value, json};

use crate::capability::{
    CapabilityError, CapabilityFuture, CitationLookup, SimilarityAnalyzer, SimilarityHit,
};

const CHAT_ENDPOINT: &str = "https://api.cohere.com/v1/chat";
const DEFAULT_MODEL: &str = "command-r-plus";

/// Cohere-backed citation lookup and similarity analysis.
///
/// Both capabilities go through the chat endpoint; the response `citations`
/// array carries the attribution data, and `documents` maps citation
/// document ids to source identifiers.
pub struct CohereProvider {
    api_key: String,
    model: String,
}

impl CohereProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    async fn chat(
        &self,
        body: Value,
        client: &reqwest::Client,
        timeout: Duration,
    ) -> Result<Value, CapabilityError> {
        let resp = client
            .post(CHAT_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| CapabilityError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CapabilityError::Status(status.as_u16()));
        }

        resp.json()
            .await
            .map_err(|e| CapabilityError::Malformed(e.to_string()))
    }
}

/// Index the response `documents` array by id, preferring url over title
/// over snippet as the source identifier.
fn document_index(data: &Value) -> HashMap<String, String> {
    data["documents"]
        .as_array()
        .map(|docs| {
            docs.iter()
                .filter_map(|d| {
                    let id = d["id"].as_str()?;
                    let label = d["url"]
                        .as_str()
                        .or_else(|| d["title"].as_str())
                        .or_else(|| d["snippet"].as_str())?;
                    Some((id.to_string(), label.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve one citation's `document_ids` through the document index,
/// preserving order and dropping unknown ids.
fn citation_sources(citation: &Value, index: &HashMap<String, String>) -> Vec<String> {
    citation["document_ids"]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str())
                .filter_map(|id| index.get(id).cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Collect the distinct source identifiers across all citations, in the
/// provider's relevance order.
fn parse_lookup_sources(data: &Value) -> Vec<String> {
    let index = document_index(data);
    let mut sources = Vec::new();
    if let Some(citations) = data["citations"].as_array() {
        for citation in citations {
            for source in citation_sources(citation, &index) {
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }
    }
    sources
}

/// One [`SimilarityHit`] per reported citation.
fn parse_similarity_hits(data: &Value) -> Vec<SimilarityHit> {
    let index = document_index(data);
    data["citations"]
        .as_array()
        .map(|citations| {
            citations
                .iter()
                .filter_map(|citation| {
                    let excerpt = citation["text"].as_str()?;
                    // Presence of a citation is itself the match signal when
                    // no explicit confidence is reported.
                    let confidence = citation["confidence"].as_f64().unwrap_or(1.0);
                    Some(SimilarityHit {
                        excerpt: excerpt.to_string(),
                        sources: citation_sources(citation, &index),
                        confidence,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

impl CitationLookup for CohereProvider {
    fn name(&self) -> &str {
        "cohere"
    }

    fn lookup<'a>(
        &'a self,
        query: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> CapabilityFuture<'a, Vec<String>> {
        Box::pin(async move {
            let body = json!({
                "model": self.model,
                "message": format!("Source this quote: {query}"),
                "citation_quality": "accurate",
            });
            let data = self.chat(body, client, timeout).await?;
            Ok(parse_lookup_sources(&data))
        })
    }
}

impl SimilarityAnalyzer for CohereProvider {
    fn name(&self) -> &str {
        "cohere"
    }

    fn analyze<'a>(
        &'a self,
        window: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> CapabilityFuture<'a, Vec<SimilarityHit>> {
        Box::pin(async move {
            let body = json!({
                "model": self.model,
                "message": format!("Identify potentially paraphrased content: {window}"),
                "temperature": 0.3,
            });
            let data = self.chat(body, client, timeout).await?;
            Ok(parse_similarity_hits(&data))
        })
    }
}
