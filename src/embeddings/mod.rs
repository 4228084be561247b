//! Embedding providers.
//!
//! Everything that turns text into vectors implements [`Embedder`], so the
//! rest of the pipeline never cares whether vectors come from an HTTP
//! inference server or the deterministic hash provider used offline.

pub mod hash;
pub mod http;

pub use hash::HashEmbedder;
pub use http::HttpEmbedder;

use async_trait::async_trait;

use crate::errors::PipelineError;
use crate::vector::Embedding;

/// A provider that maps text to fixed-dimension vectors.
///
/// Implementations must be deterministic per input within a single index
/// lifetime and must return vectors of exactly `dimension()` components.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Number of components in every vector this provider produces.
    fn dimension(&self) -> usize;

    /// Embed a batch of chunk texts, one vector per input in the same order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, PipelineError>;

    /// Embed a single question for retrieval.
    async fn embed_query(&self, text: &str) -> Result<Embedding, PipelineError>;
}
