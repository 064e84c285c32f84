//! Wire types exchanged with the backend gateway.
//!
//! Field names follow the dashboard backend's JSON so gateway
//! implementations can deserialize responses directly.

use serde::{Deserialize, Serialize};

/// Response to submit-requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementsReview {
    /// Clarifying questions or an acknowledgement.
    #[serde(default)]
    pub clarifications: Option<String>,
    /// When true the workflow stays in the requirements stage.
    #[serde(default)]
    pub needs_clarification: bool,
}

/// Response to generate-solution and refine-solution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionProposal {
    #[serde(default)]
    pub solution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineSolutionRequest {
    pub requirements: String,
    pub current_solution: String,
    pub feedback: String,
}

/// One prior-art match returned by search-similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarSolution {
    pub title: String,
    pub summary: String,
    /// Relevance in [0, 1].
    pub relevance: f64,
}

impl SimilarSolution {
    /// Relevance as a whole percentage, clamped to 0..=100.
    pub fn relevance_percent(&self) -> u32 {
        (self.relevance.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImproviseRequest {
    pub requirements: String,
    pub current_solution: String,
    /// Summaries of the prior-art matches.
    pub similar_solutions: Vec<String>,
    pub user_input: String,
}

/// Response to improvise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovisedSolution {
    #[serde(default)]
    pub final_solution: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A configured document source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl SourceSummary {
    /// Type tag of Cloud ALM sources.
    pub const CALM: &'static str = "CALM";

    pub fn is_connected_system(&self) -> bool {
        self.source_type.eq_ignore_ascii_case(Self::CALM)
    }
}

/// A secondary resource (project) inside a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
}

/// What to sync: a whole source, or one project in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncScope {
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl SyncScope {
    pub fn source(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            project_id: None,
        }
    }

    pub fn project(source_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            project_id: Some(project_id.into()),
        }
    }
}

/// Counts reported by one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn merge(&mut self, other: SyncReport) {
        self.synced += other.synced;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.synced + self.skipped + self.failed
    }
}

/// A raw document response from a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl BinaryPayload {
    /// True when the backend answered with JSON instead of a document.
    pub fn is_json(&self) -> bool {
        self.content_type
            .split(';')
            .next()
            .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false)
    }
}
