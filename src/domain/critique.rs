//! Reviewer output.
//!
//! A reviewer either answers with the pass sentinel or with a list of change
//! requests. Pass detection is an exact match on the trimmed text, compared
//! case-insensitively, so a critique that merely mentions "PASS" somewhere in
//! its list of issues is still a request for changes.

use serde::{Deserialize, Serialize};

/// The exact text a reviewer returns when no further changes are needed.
pub const PASS_SENTINEL: &str = "PASS";

/// Normalized reviewer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Critique {
    /// Reviewer signalled that the content is acceptable.
    Pass,
    /// Reviewer requested changes.
    Changes {
        /// Trimmed reviewer text, handed verbatim to the refiner.
        text: String,
        /// Individual change requests extracted from `text`.
        items: Vec<String>,
    },
}

impl Critique {
    /// Parse raw reviewer output. Returns `None` when the output is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        if is_pass(text) {
            return Some(Critique::Pass);
        }

        Some(Critique::Changes {
            text: text.to_string(),
            items: extract_items(text),
        })
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Critique::Pass)
    }

    /// Text form of the critique (the sentinel for a pass).
    pub fn text(&self) -> &str {
        match self {
            Critique::Pass => PASS_SENTINEL,
            Critique::Changes { text, .. } => text,
        }
    }

    /// Number of change requests (zero for a pass).
    pub fn change_count(&self) -> usize {
        match self {
            Critique::Pass => 0,
            Critique::Changes { items, .. } => items.len(),
        }
    }
}

/// Exact, case-normalized comparison against the pass sentinel.
pub fn is_pass(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(PASS_SENTINEL)
}

/// Pull list entries ("1. foo", "2) bar", "- baz") out of reviewer text.
/// Falls back to the whole text as a single item when no list is present.
fn extract_items(text: &str) -> Vec<String> {
    let items: Vec<String> = text.lines().filter_map(list_entry).collect();

    if items.is_empty() {
        vec![text.to_string()]
    } else {
        items
    }
}

fn list_entry(line: &str) -> Option<String> {
    let line = line.trim();

    let rest = if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        rest
    } else {
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let after = &line[digits..];
        after.strip_prefix('.').or_else(|| after.strip_prefix(')'))?
    };

    let rest = rest.trim();
    if rest.is_empty() { None } else { Some(rest.to_string()) }
}
