//! Collaborator traits at the edge of the orchestration core.
//!
//! - `BackendGateway`: the dashboard backend, one method per operation
//! - `SurfaceRouter`: the page/modal router outside the chat surface
//!
//! Both are injected into the `Orchestrator`. The core never reaches for a
//! process-wide event bus or HTTP client of its own.

use std::sync::Arc;

use serde_json::Value;

use mygo_contracts::{
    agent::Surface,
    error::MygoResult,
    gateway::{
        BinaryPayload, ImproviseRequest, ImprovisedSolution, ProjectSummary,
        RefineSolutionRequest, RequirementsReview, SimilarSolution, SolutionProposal,
        SourceSummary, SyncReport, SyncScope,
    },
    request::AgentRequest,
};

/// The backend gateway: one call per backend operation.
///
/// Calls block until the backend answers or the gateway gives up. Timeouts
/// are the gateway's concern and surface here as an `Err`.
pub trait BackendGateway: Send + Sync {
    /// Run a freeform or generation request and return the JSON body.
    fn invoke(&self, request: &AgentRequest) -> MygoResult<Value>;

    /// Run a generation request in a document format and return the raw body.
    ///
    /// Implementations must not interpret the body; callers branch on
    /// `BinaryPayload::content_type`.
    fn download(&self, request: &AgentRequest) -> MygoResult<BinaryPayload>;

    /// Solution discovery: check the requirements statement.
    fn submit_requirements(&self, requirements: &str) -> MygoResult<RequirementsReview>;

    /// Solution discovery: produce the first proposal.
    fn generate_solution(&self, requirements: &str) -> MygoResult<SolutionProposal>;

    /// Solution discovery: rework the proposal from user feedback.
    fn refine_solution(&self, request: &RefineSolutionRequest) -> MygoResult<SolutionProposal>;

    /// Solution discovery: rank prior art similar to `solution_summary`.
    fn search_similar(&self, solution_summary: &str) -> MygoResult<Vec<SimilarSolution>>;

    /// Solution discovery: fold prior-art findings into a final solution.
    fn improvise(&self, request: &ImproviseRequest) -> MygoResult<ImprovisedSolution>;

    fn list_sources(&self) -> MygoResult<Vec<SourceSummary>>;

    /// List the projects of one source.
    fn list_projects(&self, source_id: &str) -> MygoResult<Vec<ProjectSummary>>;

    fn sync_source(&self, scope: &SyncScope) -> MygoResult<SyncReport>;
}

/// The outward signal asking a collaborator to open another surface.
pub trait SurfaceRouter: Send + Sync {
    fn request_surface(&self, surface: Surface);
}

impl<T: BackendGateway + ?Sized> BackendGateway for Arc<T> {
    fn invoke(&self, request: &AgentRequest) -> MygoResult<Value> {
        (**self).invoke(request)
    }

    fn download(&self, request: &AgentRequest) -> MygoResult<BinaryPayload> {
        (**self).download(request)
    }

    fn submit_requirements(&self, requirements: &str) -> MygoResult<RequirementsReview> {
        (**self).submit_requirements(requirements)
    }

    fn generate_solution(&self, requirements: &str) -> MygoResult<SolutionProposal> {
        (**self).generate_solution(requirements)
    }

    fn refine_solution(&self, request: &RefineSolutionRequest) -> MygoResult<SolutionProposal> {
        (**self).refine_solution(request)
    }

    fn search_similar(&self, solution_summary: &str) -> MygoResult<Vec<SimilarSolution>> {
        (**self).search_similar(solution_summary)
    }

    fn improvise(&self, request: &ImproviseRequest) -> MygoResult<ImprovisedSolution> {
        (**self).improvise(request)
    }

    fn list_sources(&self) -> MygoResult<Vec<SourceSummary>> {
        (**self).list_sources()
    }

    fn list_projects(&self, source_id: &str) -> MygoResult<Vec<ProjectSummary>> {
        (**self).list_projects(source_id)
    }

    fn sync_source(&self, scope: &SyncScope) -> MygoResult<SyncReport> {
        (**self).sync_source(scope)
    }
}

impl<T: SurfaceRouter + ?Sized> SurfaceRouter for Arc<T> {
    fn request_surface(&self, surface: Surface) {
        (**self).request_surface(surface)
    }
}
