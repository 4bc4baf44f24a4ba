pub mod embeddings;
pub mod index;

pub use embeddings::{EmbeddingProvider, OpenAiEmbedding, embed_query};
pub use index::{PineconeIndex, RetrievedHit, VectorIndex};

use crate::error::RetrievalError;
use std::sync::Arc;

/// Embeds a query and searches the index with it.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k: top_k.max(1),
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Hits in index order. An empty list is a valid answer.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedHit>, RetrievalError> {
        let vector = embed_query(self.embedder.as_ref(), query).await?;
        let hits = self
            .index
            .query(&vector, self.top_k)
            .await
            .map_err(|e| RetrievalError::Query(format!("{}: {e:#}", self.index.name())))?;
        tracing::debug!(hits = hits.len(), top_k = self.top_k, "Vector query complete");
        Ok(hits)
    }
}
