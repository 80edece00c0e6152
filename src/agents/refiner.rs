//! LLM-backed content refiner.

use std::sync::Arc;

use async_trait::async_trait;

use super::ask;
use super::traits::{CollaboratorError, Refiner};
use crate::domain::TaskKind;
use crate::llm::LlmClient;

const SYSTEM_PROMPT: &str = "You are a professional content editor who revises content according to review feedback.

Your task:
1. Read the original content and the review feedback carefully
2. Make targeted fixes for every point in the feedback
3. Keep the result professional, accurate and free of AI hallucinations
4. Keep the content engaging and readable";

fn user_prompt(content: &str, critique: &str) -> String {
    format!(
        "Revise the content according to the review feedback below.\n\n\
         Original content:\n{}\n\n\
         Review feedback:\n{}\n\n\
         Make sure the revised content fully addresses the feedback.",
        content, critique
    )
}

/// Refiner backed by an LLM editing prompt.
pub struct LlmRefiner {
    llm: Arc<dyn LlmClient>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmRefiner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Refiner for LlmRefiner {
    async fn refine(&self, task_kind: TaskKind, content: &str, critique: &str) -> Result<String, CollaboratorError> {
        log::debug!("Refining {} content ({} chars)", task_kind, content.len());
        ask(
            self.llm.as_ref(),
            SYSTEM_PROMPT,
            user_prompt(content, critique),
            self.temperature,
            self.max_tokens,
        )
        .await
    }
}
