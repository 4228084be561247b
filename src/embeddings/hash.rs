use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::embeddings::Embedder;
use crate::errors::PipelineError;
use crate::vector::Embedding;

/// Deterministic embedding provider with no external dependencies.
///
/// Vectors are expanded from a SHA-256 digest of the input text, so equal
/// texts always map to equal vectors and the provider works offline. Useful
/// for tests and for smoke-testing a corpus before pointing the pipeline at
/// a real inference server. The vectors carry no semantic meaning.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Result<Self, PipelineError> {
        if dimension == 0 {
            return Err(PipelineError::Config(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    fn embed_text(&self, text: &str) -> Embedding {
        let seed = Sha256::digest(text.as_bytes());

        // Expand the seed digest block by block until the vector is full.
        let mut data = Vec::with_capacity(self.dimension);
        let mut block: u32 = 0;
        while data.len() < self.dimension {
            let mut hasher = Sha256::new();
            hasher.update(seed);
            hasher.update(block.to_le_bytes());
            let digest = hasher.finalize();
            for byte in digest {
                if data.len() == self.dimension {
                    break;
                }
                // Map each byte into [-1, 1]
                data.push((byte as f32 / 255.0) * 2.0 - 1.0);
            }
            block += 1;
        }

        let mut embedding = Embedding::new(data);
        embedding.normalize();
        embedding
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, PipelineError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding, PipelineError> {
        Ok(self.embed_text(text))
    }
}
