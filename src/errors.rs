// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the document question-answering pipeline
//!
//! One taxonomy for every stage:
//! - Configuration errors (invalid chunking parameters, bad endpoints)
//! - Ingestion errors (missing data directory, unreadable files)
//! - External dependency errors (embedding service, answer synthesis)
//! - Sequencing errors (query before an index exists)
//! - Integrity errors (embedding dimension disagreement)
//! - Timeouts (embedding or synthesis exceeding their limit)

use thiserror::Error;

/// Errors surfaced by pipeline build and query operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration supplied by the caller
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failed to load documents from the ingestion directory
    #[error("Failed to load documents from {path}: {reason}")]
    DocumentLoad { path: String, reason: String },

    /// Embedding service signalled a failure
    #[error("Embedding failed: {reason}")]
    Embedding { reason: String },

    /// Answer synthesis provider signalled a failure
    #[error("Synthesis failed: {reason}")]
    Synthesis { reason: String },

    /// Query issued while no index is available
    #[error("Index not ready: pipeline state is {state}")]
    IndexNotReady { state: &'static str },

    /// Vector dimensionality disagrees with the index
    #[error("Dimension mismatch for {subject}: expected {expected}D, got {actual}D")]
    DimensionMismatch {
        subject: String,
        expected: usize,
        actual: usize,
    },

    /// Embedding or synthesis call exceeded its time limit
    #[error("Timeout: {stage} exceeded {seconds}s limit")]
    Timeout { stage: &'static str, seconds: u64 },
}

impl PipelineError {
    /// Get user-friendly error message for CLI and API surfaces
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::IndexNotReady { state } => {
                if *state == "building" {
                    "Indexing is still in progress. Try again once it finishes.".to_string()
                } else {
                    "No documents indexed yet. Build the index before asking questions."
                        .to_string()
                }
            }
            PipelineError::Embedding { .. } => {
                "Embedding service unavailable. Check the embedding endpoint and try again."
                    .to_string()
            }
            PipelineError::Synthesis { .. } => {
                "Answer service unavailable. Check the synthesis endpoint and API key, then try again."
                    .to_string()
            }
            PipelineError::DimensionMismatch {
                expected, actual, ..
            } => {
                format!(
                    "Index integrity error: expected {}D vectors, found {}D. Rebuild the index with a matching embedding model.",
                    expected, actual
                )
            }
            PipelineError::Timeout { stage, seconds } => {
                format!("The {} step timed out after {}s. Try again.", stage, seconds)
            }
            _ => self.to_string(),
        }
    }

    /// Get error code for logging and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "CONFIG_INVALID",
            PipelineError::DocumentLoad { .. } => "DOCUMENT_LOAD_FAILED",
            PipelineError::Embedding { .. } => "EMBEDDING_FAILED",
            PipelineError::Synthesis { .. } => "SYNTHESIS_FAILED",
            PipelineError::IndexNotReady { .. } => "INDEX_NOT_READY",
            PipelineError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            PipelineError::Timeout { .. } => "TIMEOUT",
        }
    }

    /// Check if this error is retryable without changing inputs
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::Embedding { .. }
                | PipelineError::Synthesis { .. }
                | PipelineError::Timeout { .. }
        )
    }
}
