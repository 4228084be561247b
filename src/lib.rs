// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chunker;
pub mod cli;
pub mod config;
pub mod documents;
pub mod embeddings;
pub mod errors;
pub mod pipeline;
pub mod retriever;
pub mod synthesis;
pub mod vector;

// Re-export the core pipeline surface
pub use chunker::{Chunk, TextChunker};
pub use config::{EmbeddingConfig, PipelineConfig, SynthesisConfig};
pub use documents::{load_documents, Document};
pub use embeddings::{Embedder, HashEmbedder, HttpEmbedder};
pub use errors::PipelineError;
pub use pipeline::{IndexState, Pipeline, PipelineStatus};
pub use retriever::Retriever;
pub use synthesis::{Answer, ChatSynthesizer, PromptTemplate, Synthesizer};
pub use vector::{Embedding, ScoredChunk, VectorStore};
