use crate::core::providers::{build_provider_client_with_timeout, sanitize_api_error};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One similarity-search match. `metadata` is kept exactly as the index
/// returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedHit {
    pub text: String,
    pub score: f32,
    pub metadata: Map<String, Value>,
}

/// Similarity search over a pre-populated index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    fn name(&self) -> &str;

    /// Top `top_k` matches in the order the index ranks them.
    async fn query(&self, vector: &[f32], top_k: usize) -> anyhow::Result<Vec<RetrievedHit>>;
}

// ── Pinecone-style data-plane client ─────────────────────────

pub struct PineconeIndex {
    client: reqwest::Client,
    cached_query_url: String,
    api_key: String,
    namespace: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

impl From<QueryMatch> for RetrievedHit {
    fn from(m: QueryMatch) -> Self {
        let metadata = m.metadata.unwrap_or_default();
        let text = metadata
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            text,
            score: m.score,
            metadata,
        }
    }
}

impl PineconeIndex {
    pub fn new(host: &str, api_key: &str, namespace: Option<&str>, timeout_secs: u64) -> Self {
        Self {
            client: build_provider_client_with_timeout(timeout_secs),
            cached_query_url: format!("{}/query", host.trim_end_matches('/')),
            api_key: api_key.to_string(),
            namespace: namespace
                .map(str::trim)
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
        }
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        "pinecone"
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> anyhow::Result<Vec<RetrievedHit>> {
        let resp = self
            .client
            .post(&self.cached_query_url)
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
                namespace: self.namespace.as_deref(),
            })
            .send()
            .await
            .context("Vector query request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Vector index error {status}: {}", sanitize_api_error(&body));
        }

        let parsed: QueryResponse = resp
            .json()
            .await
            .context("Vector query response JSON decode failed")?;

        Ok(parsed.matches.into_iter().map(RetrievedHit::from).collect())
    }
}
