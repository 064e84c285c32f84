//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use mygo_contracts::{
    agent::Surface,
    error::{MygoError, MygoResult},
    gateway::{
        BinaryPayload, ImproviseRequest, ImprovisedSolution, ProjectSummary,
        RefineSolutionRequest, RequirementsReview, SimilarSolution, SolutionProposal,
        SourceSummary, SyncReport, SyncScope,
    },
    request::{AgentRequest, Operation},
};

use crate::traits::{BackendGateway, SurfaceRouter};

#[derive(Default)]
struct Script {
    invoke: VecDeque<MygoResult<Value>>,
    download: VecDeque<MygoResult<BinaryPayload>>,
    requirements: VecDeque<MygoResult<RequirementsReview>>,
    solutions: VecDeque<MygoResult<SolutionProposal>>,
    similar: VecDeque<MygoResult<Vec<SimilarSolution>>>,
    improvise: VecDeque<MygoResult<ImprovisedSolution>>,
    sources: VecDeque<MygoResult<Vec<SourceSummary>>>,
    projects: VecDeque<MygoResult<Vec<ProjectSummary>>>,
    sync: VecDeque<MygoResult<SyncReport>>,

    calls: Vec<Operation>,
    requests: Vec<AgentRequest>,
    downloads: Vec<AgentRequest>,
    refinements: Vec<RefineSolutionRequest>,
    improvisations: Vec<ImproviseRequest>,
    sync_scopes: Vec<SyncScope>,
}

/// A gateway answering from per-operation queues.
///
/// Solution generation and refinement share one queue. An exhausted queue
/// answers with a transport error.
#[derive(Default)]
pub(crate) struct MockGateway {
    script: Mutex<Script>,
}

fn next<T>(queue: &mut VecDeque<MygoResult<T>>, operation: Operation) -> MygoResult<T> {
    queue.pop_front().unwrap_or_else(|| {
        Err(MygoError::Transport {
            operation: operation.name().to_string(),
            reason: "no scripted response".to_string(),
        })
    })
}

pub(crate) fn transport_error(operation: Operation) -> MygoError {
    MygoError::Transport {
        operation: operation.name().to_string(),
        reason: "connection refused".to_string(),
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_invoke(&self, result: MygoResult<Value>) {
        self.script.lock().unwrap().invoke.push_back(result);
    }

    pub fn push_download(&self, result: MygoResult<BinaryPayload>) {
        self.script.lock().unwrap().download.push_back(result);
    }

    pub fn push_requirements(&self, result: MygoResult<RequirementsReview>) {
        self.script.lock().unwrap().requirements.push_back(result);
    }

    pub fn push_solution(&self, result: MygoResult<SolutionProposal>) {
        self.script.lock().unwrap().solutions.push_back(result);
    }

    pub fn push_similar(&self, result: MygoResult<Vec<SimilarSolution>>) {
        self.script.lock().unwrap().similar.push_back(result);
    }

    pub fn push_improvise(&self, result: MygoResult<ImprovisedSolution>) {
        self.script.lock().unwrap().improvise.push_back(result);
    }

    pub fn push_sources(&self, result: MygoResult<Vec<SourceSummary>>) {
        self.script.lock().unwrap().sources.push_back(result);
    }

    pub fn push_projects(&self, result: MygoResult<Vec<ProjectSummary>>) {
        self.script.lock().unwrap().projects.push_back(result);
    }

    pub fn push_sync(&self, result: MygoResult<SyncReport>) {
        self.script.lock().unwrap().sync.push_back(result);
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn downloads(&self) -> Vec<AgentRequest> {
        self.script.lock().unwrap().downloads.clone()
    }

    pub fn improvisations(&self) -> Vec<ImproviseRequest> {
        self.script.lock().unwrap().improvisations.clone()
    }

    pub fn sync_scopes(&self) -> Vec<SyncScope> {
        self.script.lock().unwrap().sync_scopes.clone()
    }
}

impl BackendGateway for MockGateway {
    fn invoke(&self, request: &AgentRequest) -> MygoResult<Value> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(request.operation());
        s.requests.push(request.clone());
        next(&mut s.invoke, request.operation())
    }

    fn download(&self, request: &AgentRequest) -> MygoResult<BinaryPayload> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(request.operation());
        s.downloads.push(request.clone());
        next(&mut s.download, request.operation())
    }

    fn submit_requirements(&self, _requirements: &str) -> MygoResult<RequirementsReview> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::SubmitRequirements);
        next(&mut s.requirements, Operation::SubmitRequirements)
    }

    fn generate_solution(&self, _requirements: &str) -> MygoResult<SolutionProposal> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::GenerateSolution);
        next(&mut s.solutions, Operation::GenerateSolution)
    }

    fn refine_solution(&self, request: &RefineSolutionRequest) -> MygoResult<SolutionProposal> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::RefineSolution);
        s.refinements.push(request.clone());
        next(&mut s.solutions, Operation::RefineSolution)
    }

    fn search_similar(&self, _solution_summary: &str) -> MygoResult<Vec<SimilarSolution>> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::SearchSimilar);
        next(&mut s.similar, Operation::SearchSimilar)
    }

    fn improvise(&self, request: &ImproviseRequest) -> MygoResult<ImprovisedSolution> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::Improvise);
        s.improvisations.push(request.clone());
        next(&mut s.improvise, Operation::Improvise)
    }

    fn list_sources(&self) -> MygoResult<Vec<SourceSummary>> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::ListSources);
        next(&mut s.sources, Operation::ListSources)
    }

    fn list_projects(&self, _source_id: &str) -> MygoResult<Vec<ProjectSummary>> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::ListProjects);
        next(&mut s.projects, Operation::ListProjects)
    }

    fn sync_source(&self, scope: &SyncScope) -> MygoResult<SyncReport> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Operation::SyncSource);
        s.sync_scopes.push(scope.clone());
        next(&mut s.sync, Operation::SyncSource)
    }
}

#[derive(Default)]
pub(crate) struct RecordingRouter {
    surfaces: Mutex<Vec<Surface>>,
}

impl RecordingRouter {
    pub fn surfaces(&self) -> Vec<Surface> {
        self.surfaces.lock().unwrap().clone()
    }
}

impl SurfaceRouter for RecordingRouter {
    fn request_surface(&self, surface: Surface) {
        self.surfaces.lock().unwrap().push(surface);
    }
}

pub(crate) fn source(id: &str, name: &str, source_type: &str) -> SourceSummary {
    SourceSummary {
        id: id.to_string(),
        name: name.to_string(),
        source_type: source_type.to_string(),
        status: Some("connected".to_string()),
    }
}

pub(crate) fn report(synced: usize, skipped: usize, failed: usize) -> SyncReport {
    SyncReport {
        synced,
        skipped,
        failed,
    }
}
