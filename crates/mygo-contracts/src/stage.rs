//! Solution discovery stages.

use serde::{Deserialize, Serialize};

/// One phase of the solution discovery workflow.
///
/// Declaration order is workflow order; `Ord` follows it. `Complete` is
/// terminal: only an explicit reset leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Requirements,
    Solution,
    Search,
    Improvise,
    Complete,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Requirements,
        Stage::Solution,
        Stage::Search,
        Stage::Improvise,
        Stage::Complete,
    ];

    /// Progress label for the stage indicator.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Requirements => "Gather Requirements",
            Stage::Solution => "Generate Solution",
            Stage::Search => "Find Similar Solutions",
            Stage::Improvise => "Review & Improvise",
            Stage::Complete => "Ready for Spec",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Requirements => "requirements",
            Stage::Solution => "solution",
            Stage::Search => "search",
            Stage::Improvise => "improvise",
            Stage::Complete => "complete",
        }
    }

    /// Whether the user may type free text in this stage.
    pub fn accepts_text(&self) -> bool {
        matches!(self, Stage::Requirements | Stage::Solution | Stage::Improvise)
    }

    /// Zero-based position in the workflow.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_terminal(&self) -> bool {
        *self == Stage::Complete
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
