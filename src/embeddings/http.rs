// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP embedding client for OpenAI-compatible /embeddings endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::EmbeddingConfig;
use crate::embeddings::Embedder;
use crate::errors::PipelineError;
use crate::vector::Embedding;

/// Client for calling an embedding inference server via OpenAI-compatible API
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimension: usize,
    api_key: Option<String>,
}

// --- OpenAI-compatible response types ---

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

impl HttpEmbedder {
    /// Create a new HttpEmbedder from the embedding service configuration
    pub fn new(config: &EmbeddingConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Embedding {
                reason: format!("cannot build HTTP client: {}", e),
            })?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "Embedding client configured: endpoint={}, model={}, dimension={}",
            endpoint, config.model, config.dimension
        );

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            dimension: config.dimension,
            api_key: config.api_key.clone(),
        })
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Embedding>, PipelineError> {
        let url = format!("{}/embeddings", self.endpoint);
        debug!("Embedding POST {} ({} inputs)", url, texts.len());

        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| PipelineError::Embedding {
            reason: format!("request to {} failed: {}", url, e),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Embedding {
                reason: format!("embedding service returned {}: {}", status, text),
            });
        }

        let api_response: OpenAIEmbeddingResponse =
            response.json().await.map_err(|e| PipelineError::Embedding {
                reason: format!("cannot decode embedding response: {}", e),
            })?;

        if api_response.data.len() != texts.len() {
            return Err(PipelineError::Embedding {
                reason: format!(
                    "embedding service returned {} vectors for {} inputs",
                    api_response.data.len(),
                    texts.len()
                ),
            });
        }

        // Servers are allowed to reorder the batch; the index field restores it.
        let mut items = api_response.data;
        items.sort_by_key(|item| item.index);

        let mut embeddings = Vec::with_capacity(items.len());
        for item in items {
            let embedding = Embedding::new(item.embedding);
            if embedding.dimension() != self.dimension {
                return Err(PipelineError::DimensionMismatch {
                    subject: "embedding response".to_string(),
                    expected: self.dimension,
                    actual: embedding.dimension(),
                });
            }
            embeddings.push(embedding);
        }
        Ok(embeddings)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, PipelineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts).await
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding, PipelineError> {
        let mut embeddings = self.request_embeddings(&[text.to_string()]).await?;
        embeddings.pop().ok_or_else(|| PipelineError::Embedding {
            reason: "embedding service returned no vectors".to_string(),
        })
    }
}
