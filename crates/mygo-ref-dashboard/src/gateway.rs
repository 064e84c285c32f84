//! In-memory implementation of `BackendGateway`.
//!
//! `InMemoryGateway` answers every operation from a `DashboardFixture`
//! (sources, projects, prior art) and the generators in `mock_data`. It
//! records every call so walkthroughs and tests can inspect what the core
//! sent, and individual operations can be switched to fail.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use mygo_contracts::{
    error::{MygoError, MygoResult},
    gateway::{
        BinaryPayload, ImproviseRequest, ImprovisedSolution, ProjectSummary,
        RefineSolutionRequest, RequirementsReview, SimilarSolution, SolutionProposal,
        SourceSummary, SyncReport, SyncScope,
    },
    request::{AgentRequest, Operation, OutputFormat},
};
use mygo_core::traits::BackendGateway;

use crate::mock_data;

/// The canned data set shipped with the reference dashboard.
pub const DASHBOARD_FIXTURE: &str = include_str!("../fixtures/dashboard.toml");

// ── Fixture schema ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardFixture {
    #[serde(default)]
    pub sources: Vec<FixtureSource>,
    /// Projects of every connected (Cloud ALM) source.
    #[serde(default)]
    pub projects: Vec<FixtureProject>,
    #[serde(default)]
    pub prior_art: Vec<FixturePriorArt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub documents: usize,
    #[serde(default)]
    pub already_synced: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub documents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturePriorArt {
    pub title: String,
    pub summary: String,
    pub relevance: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl DashboardFixture {
    pub fn from_toml_str(s: &str) -> MygoResult<Self> {
        toml::from_str(s).map_err(|e| MygoError::ConfigError {
            reason: format!("failed to parse dashboard fixture TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> MygoResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MygoError::ConfigError {
            reason: format!("failed to read dashboard fixture '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

// ── Internal mutable state ───────────────────────────────────────────────────

struct GatewayState {
    fixture: DashboardFixture,
    failing: HashSet<Operation>,
    json_download_errors: bool,
    calls: Vec<Operation>,
    requests: Vec<AgentRequest>,
    sync_scopes: Vec<SyncScope>,
}

/// A scripted gateway backed by a `DashboardFixture`.
///
/// Clones share state, so a test can keep one handle while the
/// orchestrator owns another.
#[derive(Clone)]
pub struct InMemoryGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl InMemoryGateway {
    pub fn new(fixture: DashboardFixture) -> Self {
        Self {
            state: Arc::new(Mutex::new(GatewayState {
                fixture,
                failing: HashSet::new(),
                json_download_errors: false,
                calls: Vec::new(),
                requests: Vec::new(),
                sync_scopes: Vec::new(),
            })),
        }
    }

    /// A gateway over the shipped fixture.
    pub fn with_default_fixture() -> MygoResult<Self> {
        Ok(Self::new(DashboardFixture::from_toml_str(DASHBOARD_FIXTURE)?))
    }

    /// Make every call to `operation` fail with a 503.
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// Answer downloads with a JSON error body instead of a document.
    pub fn set_json_download_errors(&self, enabled: bool) {
        self.lock().json_download_errors = enabled;
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.lock().requests.clone()
    }

    pub fn sync_scopes(&self) -> Vec<SyncScope> {
        self.lock().sync_scopes.clone()
    }

    // A poisoned lock only means a panicking test thread; the data is still usable.
    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and fail it if the operation is switched off.
    fn enter(&self, operation: Operation) -> MygoResult<MutexGuard<'_, GatewayState>> {
        let mut state = self.lock();
        state.calls.push(operation);
        debug!(operation = operation.name(), "in-memory gateway call");
        if state.failing.contains(&operation) {
            return Err(MygoError::Status {
                operation: operation.name().to_string(),
                status: 503,
                message: "simulated outage".to_string(),
            });
        }
        Ok(state)
    }
}

fn generate(request: &AgentRequest) -> Value {
    match request {
        AgentRequest::Ask { query } => json!({ "answer": mock_data::answer(query) }),
        AgentRequest::GenerateSpec {
            spec_type,
            requirements,
            ..
        } => json!({ "spec": mock_data::specification(*spec_type, requirements) }),
        AgentRequest::GeneratePrompt { language, task, .. } => {
            json!({ "prompt": mock_data::prompt(language, task) })
        }
        AgentRequest::GenerateTestCases {
            code, test_type, ..
        } => json!({ "test_cases": mock_data::test_cases(*test_type, code) }),
        AgentRequest::ExplainCode {
            code, code_type, ..
        } => json!({ "explanation": mock_data::explanation(code_type, code) }),
        AgentRequest::AnalyzeCode { code, .. } => {
            json!({ "analysis": mock_data::analysis(code) })
        }
    }
}

fn request_format(request: &AgentRequest) -> OutputFormat {
    match request {
        AgentRequest::GenerateSpec { format, .. } | AgentRequest::GenerateTestCases { format, .. } => {
            *format
        }
        _ => OutputFormat::Preview,
    }
}

fn not_found(operation: Operation, what: &str) -> MygoError {
    MygoError::Status {
        operation: operation.name().to_string(),
        status: 404,
        message: format!("{} not found", what),
    }
}

impl BackendGateway for InMemoryGateway {
    fn invoke(&self, request: &AgentRequest) -> MygoResult<Value> {
        let mut state = self.enter(request.operation())?;
        state.requests.push(request.clone());
        Ok(generate(request))
    }

    fn download(&self, request: &AgentRequest) -> MygoResult<BinaryPayload> {
        let mut state = self.enter(request.operation())?;
        state.requests.push(request.clone());
        if state.json_download_errors {
            return Ok(BinaryPayload {
                content_type: "application/json".to_string(),
                bytes: br#"{"error":"document template not available"}"#.to_vec(),
            });
        }

        let format = request_format(request);
        let text = generate(request)
            .as_object()
            .and_then(|body| body.values().next())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(BinaryPayload {
            content_type: format.mime_type().to_string(),
            bytes: mock_data::document_bytes(format.extension(), &text),
        })
    }

    fn submit_requirements(&self, requirements: &str) -> MygoResult<RequirementsReview> {
        let _state = self.enter(Operation::SubmitRequirements)?;
        if mock_data::needs_clarification(requirements) {
            return Ok(RequirementsReview {
                clarifications: Some(mock_data::clarification_questions()),
                needs_clarification: true,
            });
        }
        Ok(RequirementsReview {
            clarifications: Some(mock_data::requirements_accepted(requirements)),
            needs_clarification: false,
        })
    }

    fn generate_solution(&self, requirements: &str) -> MygoResult<SolutionProposal> {
        let _state = self.enter(Operation::GenerateSolution)?;
        Ok(SolutionProposal {
            solution: mock_data::solution_for(requirements),
        })
    }

    fn refine_solution(&self, request: &RefineSolutionRequest) -> MygoResult<SolutionProposal> {
        let _state = self.enter(Operation::RefineSolution)?;
        Ok(SolutionProposal {
            solution: mock_data::refine_solution(&request.current_solution, &request.feedback),
        })
    }

    fn search_similar(&self, solution_summary: &str) -> MygoResult<Vec<SimilarSolution>> {
        let state = self.enter(Operation::SearchSimilar)?;
        let summary = solution_summary.to_lowercase();
        let mut matches: Vec<SimilarSolution> = state
            .fixture
            .prior_art
            .iter()
            .filter(|p| p.keywords.iter().any(|k| summary.contains(&k.to_lowercase())))
            .map(|p| SimilarSolution {
                title: p.title.clone(),
                summary: p.summary.clone(),
                relevance: p.relevance,
            })
            .collect();
        matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
        Ok(matches)
    }

    fn improvise(&self, request: &ImproviseRequest) -> MygoResult<ImprovisedSolution> {
        let _state = self.enter(Operation::Improvise)?;
        Ok(ImprovisedSolution {
            final_solution: Some(mock_data::improvise(
                &request.current_solution,
                &request.similar_solutions,
                &request.user_input,
            )),
            message: Some("Here is the final solution with your instructions applied:".to_string()),
        })
    }

    fn list_sources(&self) -> MygoResult<Vec<SourceSummary>> {
        let state = self.enter(Operation::ListSources)?;
        Ok(state
            .fixture
            .sources
            .iter()
            .map(|s| SourceSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                source_type: s.source_type.clone(),
                status: s.status.clone(),
            })
            .collect())
    }

    fn list_projects(&self, source_id: &str) -> MygoResult<Vec<ProjectSummary>> {
        let state = self.enter(Operation::ListProjects)?;
        let source = state
            .fixture
            .sources
            .iter()
            .find(|s| s.id == source_id)
            .ok_or_else(|| not_found(Operation::ListProjects, "source"))?;
        if !source.source_type.eq_ignore_ascii_case(SourceSummary::CALM) {
            return Ok(Vec::new());
        }
        Ok(state
            .fixture
            .projects
            .iter()
            .map(|p| ProjectSummary {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect())
    }

    fn sync_source(&self, scope: &SyncScope) -> MygoResult<SyncReport> {
        let mut state = self.enter(Operation::SyncSource)?;
        state.sync_scopes.push(scope.clone());

        let source = state
            .fixture
            .sources
            .iter()
            .find(|s| s.id == scope.source_id)
            .ok_or_else(|| not_found(Operation::SyncSource, "source"))?;

        match &scope.project_id {
            Some(project_id) => {
                let project = state
                    .fixture
                    .projects
                    .iter()
                    .find(|p| &p.id == project_id)
                    .ok_or_else(|| not_found(Operation::SyncSource, "project"))?;
                Ok(SyncReport {
                    synced: project.documents,
                    skipped: 0,
                    failed: 0,
                })
            }
            None => {
                let skipped = source.already_synced.min(source.documents);
                Ok(SyncReport {
                    synced: source.documents - skipped,
                    skipped,
                    failed: 0,
                })
            }
        }
    }
}
