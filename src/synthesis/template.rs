// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt assembly for grounded question answering

use crate::errors::PipelineError;

/// Separator placed between context passages inside the prompt
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

const DEFAULT_TEMPLATE: &str = "Answer the question based only on the context provided below.
Be concise and accurate.
If the context does not contain the answer, say so briefly.

<context>
{context}
</context>

Question: {question}";

/// Prompt template with `{context}` and `{question}` placeholders.
///
/// The instructions sit outside the delimited context block so retrieved
/// text can never be mistaken for instructions.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Create a template from custom text; both placeholders are required
    pub fn custom(template: impl Into<String>) -> Result<Self, PipelineError> {
        let template = template.into();
        if !template.contains("{context}") {
            return Err(PipelineError::Config(
                "prompt template is missing the {context} placeholder".to_string(),
            ));
        }
        if !template.contains("{question}") {
            return Err(PipelineError::Config(
                "prompt template is missing the {question} placeholder".to_string(),
            ));
        }
        Ok(Self { template })
    }

    /// Render the prompt for a question over the given context passages
    ///
    /// Passages are joined in the order given; retrieval order is preserved.
    pub fn render(&self, question: &str, contexts: &[&str]) -> String {
        let context = contexts.join(CONTEXT_SEPARATOR);
        self.template
            .replace("{context}", &context)
            .replace("{question}", question)
    }
}
