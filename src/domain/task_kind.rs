//! Task kinds supported by the workflow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of task categories a run can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// AI industry news brief built from the last 24h of search results
    Brief,
    /// Computer vision project / trend analysis
    Cv,
    /// Paper summary (quarantined, see `GeneratorSlot::Placeholder`)
    Paper,
}

impl TaskKind {
    /// Every task kind, in display order.
    pub const ALL: [TaskKind; 3] = [TaskKind::Brief, TaskKind::Cv, TaskKind::Paper];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Brief => "brief",
            TaskKind::Cv => "cv",
            TaskKind::Paper => "paper",
        }
    }

    /// Short human description used by the CLI and reviewer prompts.
    pub fn description(&self) -> &'static str {
        match self {
            TaskKind::Brief => "AI industry hot-topic brief",
            TaskKind::Cv => "computer vision project / trend analysis",
            TaskKind::Paper => "paper summary",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string names no known task kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task kind '{0}' (expected one of: brief, cv, paper)")]
pub struct UnknownTaskKind(pub String);

impl FromStr for TaskKind {
    type Err = UnknownTaskKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(TaskKind::Brief),
            "cv" => Ok(TaskKind::Cv),
            "paper" => Ok(TaskKind::Paper),
            _ => Err(UnknownTaskKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!("brief".parse::<TaskKind>().unwrap(), TaskKind::Brief);
        assert_eq!("cv".parse::<TaskKind>().unwrap(), TaskKind::Cv);
        assert_eq!("paper".parse::<TaskKind>().unwrap(), TaskKind::Paper);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" BRIEF ".parse::<TaskKind>().unwrap(), TaskKind::Brief);
        assert_eq!("Cv".parse::<TaskKind>().unwrap(), TaskKind::Cv);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "unknown".parse::<TaskKind>().unwrap_err();
        assert_eq!(err, UnknownTaskKind("unknown".to_string()));
        assert!(err.to_string().contains("unknown task kind 'unknown'"));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for kind in TaskKind::ALL {
            assert_eq!(kind.to_string().parse::<TaskKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TaskKind::Cv).unwrap();
        assert_eq!(json, "\"cv\"");
    }
}
