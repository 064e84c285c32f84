//! Agent identity and presentation metadata.

use serde::{Deserialize, Serialize};

use crate::{action::Action, request::RequestShape};

/// Stable identifier of an agent, e.g. `AgentId("solution-advisor")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the orchestration layer knows about one agent.
///
/// Descriptors are built once at startup and only ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub id: AgentId,
    pub name: String,
    pub description: String,
    /// How a freeform turn becomes a backend request.
    pub shape: RequestShape,
    /// Actions offered before the user has typed anything.
    #[serde(default)]
    pub welcome_actions: Vec<Action>,
    pub placeholder: String,
    /// Whether a full editor dialog exists for this agent.
    #[serde(default)]
    pub full_editor: bool,
}

impl AgentDescriptor {
    pub fn is_staged(&self) -> bool {
        self.shape.is_staged()
    }
}

/// A UI surface outside the chat that the core may ask the page router to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    /// The full editor dialog of an agent.
    FullEditor(AgentId),
    /// Source and connection settings.
    Settings,
    /// The spec creation dialog, seeded with a finalized solution.
    SpecCreation { solution: String },
}
