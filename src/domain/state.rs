//! Task state and its reducer.
//!
//! Stages never mutate `TaskState` directly. Each stage returns a
//! [`StatePatch`] and the control loop folds it in with [`merge`]:
//!
//! - `iteration_count`: integer addition
//! - `trace`: sequence concatenation
//! - every other field: last write wins

use serde::{Deserialize, Serialize};

use super::critique::Critique;
use super::task_kind::TaskKind;
use super::trace::{Trace, TraceEntry};

/// The single record threaded through one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub task_kind: TaskKind,
    pub input_query: String,
    pub content: String,
    pub image_ref: Option<String>,
    pub critique: Option<Critique>,
    pub iteration_count: u32,
    pub trace: Trace,
}

impl TaskState {
    /// Fresh state with empty/zero defaults.
    pub fn new(task_kind: TaskKind, input_query: impl Into<String>) -> Self {
        Self {
            task_kind,
            input_query: input_query.into(),
            content: String::new(),
            image_ref: None,
            critique: None,
            iteration_count: 0,
            trace: Trace::new(),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Partial update produced by one stage.
///
/// `task_kind` and `input_query` are absent: they are immutable after
/// initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub content: Option<String>,
    pub image_ref: Option<String>,
    pub critique: Option<Critique>,
    pub iteration_delta: u32,
    pub trace: Trace,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_critique(mut self, critique: Critique) -> Self {
        self.critique = Some(critique);
        self
    }

    pub fn with_iteration_delta(mut self, delta: u32) -> Self {
        self.iteration_delta = delta;
        self
    }

    pub fn with_trace(mut self, entry: TraceEntry) -> Self {
        self.trace.push(entry);
        self
    }
}

/// Fold a patch into the state.
pub fn merge(mut state: TaskState, patch: StatePatch) -> TaskState {
    if let Some(content) = patch.content {
        state.content = content;
    }
    if let Some(image_ref) = patch.image_ref {
        state.image_ref = Some(image_ref);
    }
    if let Some(critique) = patch.critique {
        state.critique = Some(critique);
    }
    state.iteration_count += patch.iteration_delta;
    state.trace.extend(patch.trace);
    state
}
