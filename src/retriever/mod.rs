//! Query-side retrieval: embed the question, rank the index.

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::PipelineError;
use crate::vector::{ScoredChunk, VectorStore};

/// Retrieves the chunks most similar to a question.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self { embedder, top_k }
    }

    /// Embed the question and return the top-K most similar chunks
    ///
    /// Returns fewer than K hits when the index holds fewer chunks. Hits are
    /// ordered best match first.
    pub async fn retrieve(
        &self,
        question: &str,
        store: &VectorStore,
    ) -> Result<Vec<ScoredChunk>, PipelineError> {
        let query = self.embedder.embed_query(question).await?;
        let hits = store.search(&query, self.top_k)?;
        if let Some(best) = hits.first() {
            debug!(
                "Retrieved {}/{} chunks, best score {:.4} ({})",
                hits.len(),
                self.top_k,
                best.score,
                best.chunk.id()
            );
        }
        Ok(hits)
    }
}
