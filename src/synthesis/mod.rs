//! Answer synthesis.
//!
//! A [`Synthesizer`] turns a question plus retrieved context into a grounded
//! answer. Failures always surface as errors; there is no fallback to a
//! default answer text.

pub mod chat;
pub mod template;

pub use chat::ChatSynthesizer;
pub use template::PromptTemplate;

use async_trait::async_trait;

use crate::errors::PipelineError;
use crate::vector::ScoredChunk;

/// A synthesized answer and how long the provider took to produce it
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub synthesis_time_ms: u64,
}

/// Turns a question and its retrieved context into an answer.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize an answer from the question and context chunks.
    ///
    /// Chunks arrive in retrieval order (best match first) and are the only
    /// material the answer may draw from.
    async fn synthesize(
        &self,
        question: &str,
        context: &[ScoredChunk],
    ) -> Result<Answer, PipelineError>;
}
