//! Domain types for quillr
//!
//! - TaskKind: the closed set of task categories
//! - TaskState / StatePatch / merge: the run state and its reducer
//! - Critique: normalized reviewer output and pass detection
//! - Trace: append-only step log
//! - RunReport / Acceptance: what a completed run hands back

pub mod critique;
pub mod outcome;
pub mod stage;
pub mod state;
pub mod task_kind;
pub mod trace;

pub use critique::{Critique, PASS_SENTINEL, is_pass};
pub use outcome::{Acceptance, RunReport};
pub use stage::Stage;
pub use state::{StatePatch, TaskState, merge};
pub use task_kind::{TaskKind, UnknownTaskKind};
pub use trace::{Trace, TraceEntry};
