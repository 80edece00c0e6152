//! Collaborator interfaces consumed by the control loop.
//!
//! The loop only ever talks to these four traits. Each call is awaited to
//! completion before the loop moves on, and any `Err` is fatal to the run.
//! Fallbacks (mock search, degraded modes) live inside implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TaskKind;
use crate::image::ImageError;
use crate::llm::LlmError;
use crate::search::SearchError;

/// Failure raised by a collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

/// Produces the first draft for a task.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, task_kind: TaskKind, input_query: &str) -> Result<String, CollaboratorError>;

    /// Short name for logs and trace entries.
    fn name(&self) -> &str {
        "generator"
    }
}

/// Reviews content and answers with the pass sentinel or change requests.
#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn review(&self, task_kind: TaskKind, content: &str) -> Result<String, CollaboratorError>;
}

/// Revises content according to a critique.
#[async_trait]
pub trait Refiner: Send + Sync {
    async fn refine(&self, task_kind: TaskKind, content: &str, critique: &str) -> Result<String, CollaboratorError>;
}

/// Produces an image reference for finalized content.
#[async_trait]
pub trait Illustrator: Send + Sync {
    async fn illustrate(&self, task_kind: TaskKind, content: &str) -> Result<String, CollaboratorError>;
}
