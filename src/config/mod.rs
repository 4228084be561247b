//! Pipeline configuration
//!
//! Defaults follow the product defaults (chunk_size 1000, chunk_overlap 200,
//! top_k 4, `data/` ingestion directory). Values are layered: built-in
//! defaults, then an optional TOML file, then environment variables, then CLI
//! flags applied by the caller. `validate()` runs before any build or query.

use crate::errors::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Embedding service configuration (OpenAI-compatible /embeddings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub model: String,
    pub dimension: usize,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1".to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            api_key: None,
            timeout_secs: 120,
        }
    }
}

/// Answer synthesis configuration (OpenAI-compatible /chat/completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key: None,
            timeout_secs: 120,
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub embedding: EmbeddingConfig,
    pub synthesis: SynthesisConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
            embedding: EmbeddingConfig::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("cannot parse config file {}: {}", path, e)))
    }

    /// Load configuration from environment variables on top of defaults
    ///
    /// Starts from the built-in defaults (or `docqa.toml` in the working
    /// directory when present) and overrides fields from the environment.
    pub fn from_env() -> Self {
        let mut config = if std::path::Path::new("docqa.toml").exists() {
            Self::from_file("docqa.toml").unwrap_or_default()
        } else {
            Self::default()
        };
        config.apply_env();
        config
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("CHUNK_SIZE") {
            if let Ok(num) = val.parse() {
                self.chunk_size = num;
            }
        }
        if let Ok(val) = std::env::var("CHUNK_OVERLAP") {
            if let Ok(num) = val.parse() {
                self.chunk_overlap = num;
            }
        }
        if let Ok(val) = std::env::var("TOP_K") {
            if let Ok(num) = val.parse() {
                self.top_k = num;
            }
        }

        if let Ok(val) = std::env::var("EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = val;
        }
        if let Ok(val) = std::env::var("EMBEDDING_MODEL") {
            self.embedding.model = val;
        }
        if let Ok(val) = std::env::var("EMBEDDING_DIMENSION") {
            if let Ok(num) = val.parse() {
                self.embedding.dimension = num;
            }
        }
        if let Ok(val) = std::env::var("EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("EMBED_TIMEOUT_SECS") {
            if let Ok(num) = val.parse() {
                self.embedding.timeout_secs = num;
            }
        }

        if let Ok(val) = std::env::var("SYNTHESIS_ENDPOINT") {
            self.synthesis.endpoint = val;
        }
        if let Ok(val) = std::env::var("SYNTHESIS_MODEL") {
            self.synthesis.model = val;
        }
        if let Ok(val) = std::env::var("GROQ_API_KEY") {
            self.synthesis.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("SYNTHESIS_TIMEOUT_SECS") {
            if let Ok(num) = val.parse() {
                self.synthesis.timeout_secs = num;
            }
        }
    }

    /// Validate the configuration against the pipeline contracts
    ///
    /// # Validation Rules
    /// 1. `chunk_size` must be greater than 0
    /// 2. `chunk_overlap` must be smaller than `chunk_size`
    /// 3. `top_k` must be greater than 0
    /// 4. embedding dimension must be greater than 0
    /// 5. endpoints and model names must not be empty
    /// 6. timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(PipelineError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(PipelineError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(PipelineError::Config(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }
        if self.embedding.endpoint.trim().is_empty() {
            return Err(PipelineError::Config(
                "embedding endpoint cannot be empty".to_string(),
            ));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(PipelineError::Config(
                "embedding model cannot be empty".to_string(),
            ));
        }
        if self.synthesis.endpoint.trim().is_empty() {
            return Err(PipelineError::Config(
                "synthesis endpoint cannot be empty".to_string(),
            ));
        }
        if self.synthesis.model.trim().is_empty() {
            return Err(PipelineError::Config(
                "synthesis model cannot be empty".to_string(),
            ));
        }
        if self.embedding.timeout_secs == 0 || self.synthesis.timeout_secs == 0 {
            return Err(PipelineError::Config(
                "timeouts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
