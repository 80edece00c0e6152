//! Error types for quillr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::agents::CollaboratorError;
use crate::domain::{Stage, Trace};

/// Everything that can abort a run. All variants are fatal; the control loop
/// never retries.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Unsupported task kind (caller's fault)
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// A stage was entered without what it needs (upstream bug)
    #[error("Precondition failed at {stage}: {reason}")]
    Precondition { stage: Stage, reason: String },

    /// A generator, reviewer, refiner or illustrator failed
    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: CollaboratorError,
    },
}

impl WorkflowError {
    pub fn precondition(stage: Stage, reason: impl Into<String>) -> Self {
        WorkflowError::Precondition {
            stage,
            reason: reason.into(),
        }
    }

    pub fn collaborator(stage: Stage, source: CollaboratorError) -> Self {
        WorkflowError::Collaborator { stage, source }
    }

    /// Stage the failure happened in.
    pub fn stage(&self) -> Stage {
        match self {
            WorkflowError::InvalidTask(_) => Stage::Route,
            WorkflowError::Precondition { stage, .. } => *stage,
            WorkflowError::Collaborator { stage, .. } => *stage,
        }
    }
}

/// A failed run: the error plus every trace entry recorded before it.
#[derive(Debug, Error)]
#[error("run failed at {}", error.stage())]
pub struct RunError {
    #[source]
    pub error: WorkflowError,
    pub trace: Trace,
}

impl RunError {
    pub fn new(error: WorkflowError, trace: Trace) -> Self {
        Self { error, trace }
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;
