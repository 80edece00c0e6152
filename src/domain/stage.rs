//! Control loop stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A state of the control loop.
///
/// `Route -> Generate -> Review -> {Refine -> Review}* -> Illustrate -> Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Route,
    Generate,
    Review,
    Refine,
    Illustrate,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Route => "route",
            Stage::Generate => "generate",
            Stage::Review => "review",
            Stage::Refine => "refine",
            Stage::Illustrate => "illustrate",
            Stage::Done => "done",
        }
    }

    /// Whether the stage needs non-empty content before it may run.
    pub fn requires_content(&self) -> bool {
        matches!(self, Stage::Review | Stage::Refine | Stage::Illustrate)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
