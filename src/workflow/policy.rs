//! Continuation policy, evaluated after every review.

use crate::domain::{Critique, Stage};

/// Maximum number of refine cycles before the content is accepted as-is.
pub const ITERATION_CAP: u32 = 2;

/// What the loop does after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// The reviewer passed the content.
    Accept,
    /// The cap is reached; the content ships despite open change requests.
    ForceAccept,
    /// Another refine cycle.
    Refine,
}

impl Continuation {
    pub fn next_stage(&self) -> Stage {
        match self {
            Continuation::Accept | Continuation::ForceAccept => Stage::Illustrate,
            Continuation::Refine => Stage::Refine,
        }
    }
}

/// 1. pass sentinel -> accept
/// 2. `iteration_count >= ITERATION_CAP` -> forced accept
/// 3. otherwise -> refine
pub fn decide(critique: &Critique, iteration_count: u32) -> Continuation {
    if critique.is_pass() {
        Continuation::Accept
    } else if iteration_count >= ITERATION_CAP {
        Continuation::ForceAccept
    } else {
        Continuation::Refine
    }
}
