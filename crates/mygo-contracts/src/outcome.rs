//! Outcomes reported by the orchestration entry points.
//!
//! None of these are errors. Callers pattern-match to decide what to render:
//! - `Rejected` → nothing changed, nothing was appended
//! - `Completed` → the log grew by `messages` assistant turns
//! - `Failed` → a backend call failed and one error message was appended
//! - `Discarded` → the response belonged to an abandoned conversation
//! - `DraftUpdated` → the input draft was filled in, nothing was sent
//! - `Ignored` → the action id is not one this version understands

use serde::{Deserialize, Serialize};

use crate::{request::OutputFormat, stage::Stage};

/// Why an operation was rejected without touching the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The text was empty or whitespace only.
    EmptyInput,
    /// Another backend call is still outstanding.
    CallPending,
    /// The current stage does not take free text.
    StageClosed { stage: Stage },
    /// The action is not legal in the current state.
    ActionUnavailable { action_id: String },
    /// A refinement or download was requested before anything was generated.
    NoArtifact,
    /// The artifact kind has no document representation.
    DownloadUnsupported,
}

/// Result of one chat entry point call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Rejected { reason: RejectReason },
    Completed { messages: usize },
    Failed { reason: String },
    Discarded,
    DraftUpdated,
    Ignored,
}

impl TurnOutcome {
    pub fn rejected(reason: RejectReason) -> Self {
        TurnOutcome::Rejected { reason }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, TurnOutcome::Rejected { .. })
    }
}

/// Result of a generate or refine call on a refinement loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopOutcome {
    Rejected { reason: RejectReason },
    /// The artifact was (re)placed.
    Produced,
    /// The call failed; the previous artifact, if any, is unchanged.
    Failed { message: String },
}

/// A document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

/// Result of a download request on a refinement loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Rejected { reason: RejectReason },
    Ready(DownloadedArtifact),
    Failed { message: String },
}
