//! LLM-backed editor review.
//!
//! The reviewer is told to answer with exactly `PASS` or a numbered list of
//! change requests. It returns the raw text; deciding what counts as a pass is
//! the control loop's job.

use std::sync::Arc;

use async_trait::async_trait;

use super::ask;
use super::traits::{CollaboratorError, Reviewer};
use crate::domain::{PASS_SENTINEL, TaskKind};
use crate::llm::LlmClient;

fn system_prompt() -> String {
    format!(
        "You are a meticulous editor reviewing the quality of social media content.

Review criteria:
1. **Professionalism**: is the content professional, accurate and in line with industry standards?
2. **AI hallucination**: does it contain hallucinations (false information, inaccurate descriptions, exaggeration)?
3. **Illustration description**: is the illustration description appealing and does it match the content?

Output rules:
- If the content fully passes, output only: {pass}
- Otherwise output concrete change requests in this format:

Change requests:
1. [specific issue 1 and suggested fix]
2. [specific issue 2 and suggested fix]
...

Review strictly.",
        pass = PASS_SENTINEL
    )
}

fn task_context(task_kind: TaskKind) -> &'static str {
    match task_kind {
        TaskKind::Brief => "an AI industry hot-topic brief",
        TaskKind::Cv => "a CV project / trend analysis report",
        TaskKind::Paper => "generated content",
    }
}

fn user_prompt(task_kind: TaskKind, content: &str) -> String {
    format!(
        "Review the following {}:\n\n{}\n\n\
         Apply the review criteria strictly, paying particular attention to:\n\
         1. whether the content is professional and accurate\n\
         2. whether it contains AI hallucinations\n\
         3. whether the illustration description is appealing\n\n\
         Give your verdict.",
        task_context(task_kind),
        content
    )
}

/// Reviewer backed by an LLM editor prompt.
pub struct LlmReviewer {
    llm: Arc<dyn LlmClient>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmReviewer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            temperature: 0.3,
            max_tokens: 1024,
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
impl Reviewer for LlmReviewer {
    async fn review(&self, task_kind: TaskKind, content: &str) -> Result<String, CollaboratorError> {
        ask(
            self.llm.as_ref(),
            system_prompt(),
            user_prompt(task_kind, content),
            self.temperature,
            self.max_tokens,
        )
        .await
    }
}
