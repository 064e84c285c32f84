//! Dashboard walkthrough scenarios.
//!
//! Each scenario wires the real orchestration core (registry, dispatcher,
//! workflow engine, refinement loop) to the in-memory gateway and recording
//! router, then prints the conversation as it unfolds.

pub mod document_sync;
pub mod refinement;
pub mod solution_discovery;

use mygo_contracts::{
    action::{Action, ActionKind},
    error::{MygoError, MygoResult},
    message::{MessageStatus, Role},
    outcome::TurnOutcome,
};
use mygo_core::{AgentRegistry, ConversationSession, Orchestrator};

use crate::{
    gateway::{DashboardFixture, InMemoryGateway},
    router::RecordingRouter,
};

/// An orchestrator plus inspectable handles to its collaborators.
pub struct Dashboard {
    pub orchestrator: Orchestrator,
    pub gateway: InMemoryGateway,
    pub router: RecordingRouter,
}

impl Dashboard {
    pub fn new(fixture: DashboardFixture) -> Self {
        let gateway = InMemoryGateway::new(fixture);
        let router = RecordingRouter::new();
        let orchestrator = Orchestrator::new(
            AgentRegistry::builtin(),
            Box::new(gateway.clone()),
            Box::new(router.clone()),
        );
        Self {
            orchestrator,
            gateway,
            router,
        }
    }

    pub fn with_default_fixture() -> MygoResult<Self> {
        Ok(Self::new(DashboardFixture::from_toml_str(
            crate::gateway::DASHBOARD_FIXTURE,
        )?))
    }
}

/// The most recent action of `kind` attached to any message.
pub fn find_action(session: &ConversationSession, kind: &ActionKind) -> Option<Action> {
    session
        .messages()
        .iter()
        .rev()
        .flat_map(|m| m.actions.iter())
        .find(|a| &a.kind == kind)
        .cloned()
}

pub(crate) fn require_action(
    session: &ConversationSession,
    kind: &ActionKind,
) -> MygoResult<Action> {
    find_action(session, kind).ok_or_else(|| MygoError::UnexpectedResponse {
        operation: "walkthrough".to_string(),
        reason: format!("no {:?} action was offered", kind),
    })
}

/// Print every message appended since `seen`, then advance `seen`.
pub fn print_new(session: &ConversationSession, seen: &mut usize) {
    for message in session.messages().iter().skip(*seen) {
        let who = match (message.role, message.status) {
            (Role::User, _) => "user",
            (Role::Assistant, Some(MessageStatus::Error)) => "error",
            (Role::Assistant, Some(MessageStatus::Info)) => "info",
            (Role::Assistant, _) => "assistant",
        };
        let mut lines = message.content.lines();
        println!("  [{:>9}] {}", who, lines.next().unwrap_or(""));
        for line in lines {
            println!("              {}", line);
        }
        for action in &message.actions {
            println!("              > {} ({})", action.label, action.id);
        }
    }
    *seen = session.messages().len();
}

pub fn print_outcome(outcome: &TurnOutcome) {
    println!("  Outcome: {:?}", outcome);
}
