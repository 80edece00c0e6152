//! The review/refine control loop.
//!
//! - `dispatch`: task kind to generator slot, with quarantined placeholders
//! - `policy`: what happens after each review
//! - `runner`: the stage machine itself

pub mod dispatch;
pub mod policy;
pub mod runner;

pub use dispatch::{Dispatcher, Generated, GeneratorSlot, PAPER_PLACEHOLDER, Placeholder};
pub use policy::{Continuation, ITERATION_CAP, decide};
pub use runner::{Workflow, route};
