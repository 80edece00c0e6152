//! Append-only run trace.
//!
//! Every executed stage contributes exactly one entry. The trace exists for
//! observability; the control loop never reads it to make a decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::stage::Stage;

/// One human-readable step record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Stage that produced the entry.
    pub stage: Stage,
    /// What happened, with the salient parameter (task kind, iteration, verdict).
    pub message: String,
    /// When the entry was recorded.
    pub at: DateTime<Utc>,
}

impl TraceEntry {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

/// Ordered, append-only sequence of trace entries.
///
/// Entries cannot be removed, reordered or edited once pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(Vec<TraceEntry>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.0.push(entry);
    }

    /// Concatenate `other` onto the end of this trace.
    pub fn extend(&mut self, other: Trace) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.0
    }

    /// Stages in the order they were recorded.
    pub fn stages(&self) -> Vec<Stage> {
        self.0.iter().map(|e| e.stage).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.0.iter()
    }
}

impl From<TraceEntry> for Trace {
    fn from(entry: TraceEntry) -> Self {
        Self(vec![entry])
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
