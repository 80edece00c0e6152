//! Run outcome types.

use serde::{Deserialize, Serialize};

use super::state::TaskState;
use super::task_kind::TaskKind;
use super::trace::Trace;

/// How the content left the review loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Acceptance {
    /// The reviewer returned the pass sentinel.
    Passed,
    /// The iteration cap was reached without a pass. The content may still
    /// violate the last critique.
    Forced {
        /// Change requests that were still open when the loop gave up.
        outstanding: Vec<String>,
    },
}

impl Acceptance {
    pub fn is_forced(&self) -> bool {
        matches!(self, Acceptance::Forced { .. })
    }
}

/// Result of a run that reached `Done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub task_kind: TaskKind,
    pub content: String,
    pub image_ref: String,
    pub iteration_count: u32,
    pub acceptance: Acceptance,
    pub trace: Trace,
}

impl RunReport {
    /// Build the report from a finished state. Returns `None` when the state
    /// has no image reference, i.e. it never went through `Illustrate`.
    pub fn from_state(state: TaskState, acceptance: Acceptance) -> Option<Self> {
        let image_ref = state.image_ref?;
        Some(Self {
            task_kind: state.task_kind,
            content: state.content,
            image_ref,
            iteration_count: state.iteration_count,
            acceptance,
            trace: state.trace,
        })
    }

    pub fn is_forced(&self) -> bool {
        self.acceptance.is_forced()
    }
}
