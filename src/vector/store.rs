// In-memory vector index over one batch of chunks
//
// Construction is the build step: embed every chunk, validate, store. The
// result is immutable, so concurrent searches need no locking. A rebuild
// constructs a fresh store; nothing merges.

use crate::chunker::Chunk;
use crate::embeddings::Embedder;
use crate::errors::PipelineError;
use crate::vector::Embedding;
use std::cmp::Ordering;
use tracing::{debug, info};

/// One retrieval hit: a chunk and its similarity to the query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Immutable vector index for one indexed corpus
#[derive(Debug)]
pub struct VectorStore {
    dimension: usize,
    entries: Vec<(Chunk, Embedding)>,
}

impl VectorStore {
    /// Embed every chunk and build the index; all-or-nothing
    ///
    /// One failed embedding fails the whole build and no store is produced.
    /// Entry order follows chunk order, which drives tie-breaking in search.
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn Embedder) -> Result<Self, PipelineError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_documents(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(PipelineError::Embedding {
                reason: format!(
                    "embedder returned {} vectors for {} chunks",
                    embeddings.len(),
                    chunks.len()
                ),
            });
        }

        let store = Self::from_embeddings(chunks, embeddings, embedder.dimension())?;
        info!(
            chunks = store.len(),
            dimension = store.dimension,
            "Vector index built"
        );
        Ok(store)
    }

    /// Assemble a store from pre-computed embeddings, validating every vector
    pub fn from_embeddings(
        chunks: Vec<Chunk>,
        embeddings: Vec<Embedding>,
        dimension: usize,
    ) -> Result<Self, PipelineError> {
        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.dimension() != dimension {
                return Err(PipelineError::DimensionMismatch {
                    subject: format!("chunk {}", chunk.id()),
                    expected: dimension,
                    actual: embedding.dimension(),
                });
            }
            if !embedding.is_finite() {
                return Err(PipelineError::Embedding {
                    reason: format!("vector for chunk {} contains non-finite values", chunk.id()),
                });
            }
            entries.push((chunk, embedding));
        }
        Ok(Self {
            dimension,
            entries,
        })
    }

    /// Top-k most similar chunks for a query vector
    ///
    /// Pure read. Sorted by descending cosine similarity; the sort is stable,
    /// so equal scores keep insertion order (first-built chunk ranks higher).
    /// `k` larger than the store returns everything; `k = 0` returns nothing.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<ScoredChunk>, PipelineError> {
        if query.dimension() != self.dimension {
            return Err(PipelineError::DimensionMismatch {
                subject: "query".to_string(),
                expected: self.dimension,
                actual: query.dimension(),
            });
        }

        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| ScoredChunk {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(k);

        debug!(
            k,
            returned = results.len(),
            top_score = results.first().map(|r| r.score).unwrap_or(0.0),
            "Vector search"
        );
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
