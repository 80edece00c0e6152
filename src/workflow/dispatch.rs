//! Task-kind to generator dispatch.
//!
//! Each task kind owns one [`GeneratorSlot`]. A slot is either a live
//! generator or a placeholder that always succeeds with constant content and
//! never touches an external service. The paper kind ships quarantined.

use std::sync::Arc;

use crate::agents::{CollaboratorError, Generator};
use crate::domain::TaskKind;

/// Content returned for the quarantined paper kind.
pub const PAPER_PLACEHOLDER: &str = "Paper agent is not enabled yet; use the brief or cv task kinds.";

/// A fixed generator payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub content: &'static str,
    pub note: &'static str,
}

impl Placeholder {
    pub const PAPER: Placeholder = Placeholder {
        content: PAPER_PLACEHOLDER,
        note: "paper generator quarantined, placeholder content used",
    };
}

/// Generator bound to a task kind.
#[derive(Clone)]
pub enum GeneratorSlot {
    Live(Arc<dyn Generator>),
    Placeholder(Placeholder),
}

/// A generator result plus a trace note describing how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub content: String,
    pub note: String,
}

impl GeneratorSlot {
    pub fn live(generator: Arc<dyn Generator>) -> Self {
        GeneratorSlot::Live(generator)
    }

    pub fn is_live(&self) -> bool {
        matches!(self, GeneratorSlot::Live(_))
    }

    pub async fn generate(&self, task_kind: TaskKind, input_query: &str) -> Result<Generated, CollaboratorError> {
        match self {
            GeneratorSlot::Live(generator) => {
                let content = generator.generate(task_kind, input_query).await?;
                Ok(Generated {
                    note: format!(
                        "{} content generated by {} ({} chars)",
                        task_kind,
                        generator.name(),
                        content.chars().count()
                    ),
                    content,
                })
            }
            GeneratorSlot::Placeholder(placeholder) => Ok(Generated {
                content: placeholder.content.to_string(),
                note: placeholder.note.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for GeneratorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorSlot::Live(generator) => f.debug_tuple("Live").field(&generator.name()).finish(),
            GeneratorSlot::Placeholder(placeholder) => f.debug_tuple("Placeholder").field(placeholder).finish(),
        }
    }
}

/// Maps every task kind to its generator slot.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    brief: GeneratorSlot,
    cv: GeneratorSlot,
    paper: GeneratorSlot,
}

impl Dispatcher {
    /// Live brief and cv generators; paper quarantined.
    pub fn new(brief: Arc<dyn Generator>, cv: Arc<dyn Generator>) -> Self {
        Self {
            brief: GeneratorSlot::Live(brief),
            cv: GeneratorSlot::Live(cv),
            paper: GeneratorSlot::Placeholder(Placeholder::PAPER),
        }
    }

    /// Replace the slot bound to `task_kind`.
    pub fn with_slot(mut self, task_kind: TaskKind, slot: GeneratorSlot) -> Self {
        *self.slot_mut(task_kind) = slot;
        self
    }

    pub fn slot(&self, task_kind: TaskKind) -> &GeneratorSlot {
        match task_kind {
            TaskKind::Brief => &self.brief,
            TaskKind::Cv => &self.cv,
            TaskKind::Paper => &self.paper,
        }
    }

    fn slot_mut(&mut self, task_kind: TaskKind) -> &mut GeneratorSlot {
        match task_kind {
            TaskKind::Brief => &mut self.brief,
            TaskKind::Cv => &mut self.cv,
            TaskKind::Paper => &mut self.paper,
        }
    }
}
