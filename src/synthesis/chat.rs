// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat-completion synthesizer for OpenAI-compatible providers

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::SynthesisConfig;
use crate::errors::PipelineError;
use crate::synthesis::{Answer, PromptTemplate, Synthesizer};
use crate::vector::ScoredChunk;

/// Client for answer synthesis via OpenAI-compatible /chat/completions
pub struct ChatSynthesizer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
    template: PromptTemplate,
}

// --- OpenAI-compatible response types ---

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChatChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChatChoice {
    message: OpenAIChatMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChatMessage {
    content: String,
}

impl ChatSynthesizer {
    /// Create a new ChatSynthesizer from the synthesis configuration
    pub fn new(config: &SynthesisConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Synthesis {
                reason: format!("cannot build HTTP client: {}", e),
            })?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "Synthesis client configured: endpoint={}, model={}",
            endpoint, config.model
        );

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            template: PromptTemplate::default(),
        })
    }

    /// Replace the default prompt template
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }
}

#[async_trait]
impl Synthesizer for ChatSynthesizer {
    async fn synthesize(
        &self,
        question: &str,
        context: &[ScoredChunk],
    ) -> Result<Answer, PipelineError> {
        let passages: Vec<&str> = context.iter().map(|c| c.chunk.text.as_str()).collect();
        let prompt = self.template.render(question, &passages);

        let url = format!("{}/chat/completions", self.endpoint);
        debug!(
            "Synthesis POST {} ({} context chunks, {} prompt bytes)",
            url,
            context.len(),
            prompt.len()
        );

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let start = Instant::now();

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| PipelineError::Synthesis {
            reason: format!("request to {} failed: {}", url, e),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Synthesis {
                reason: format!("synthesis provider returned {}: {}", status, text),
            });
        }

        let api_response: OpenAIChatResponse =
            response.json().await.map_err(|e| PipelineError::Synthesis {
                reason: format!("cannot decode chat response: {}", e),
            })?;

        let first = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::Synthesis {
                reason: "chat completion returned no choices".to_string(),
            })?;

        Ok(Answer {
            text: first.message.content,
            synthesis_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
