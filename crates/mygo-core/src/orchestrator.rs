//! The orchestrator: the presentation layer's single point of entry.
//!
//! It owns the registry and the injected collaborators and routes:
//!
//!   submitted text  → staged workflow or freeform handler
//!   invoked action  → dispatcher
//!   agent switch    → session reset
//!
//! Nothing here returns an error. Every outcome is a `TurnOutcome`.

use tracing::info;

use mygo_contracts::{
    action::Action,
    agent::AgentDescriptor,
    outcome::TurnOutcome,
};

use crate::{
    dispatcher::Dispatcher,
    freeform::FreeformHandler,
    registry::AgentRegistry,
    session::ConversationSession,
    traits::{BackendGateway, SurfaceRouter},
    workflow::SolutionDiscovery,
};

pub struct Orchestrator {
    registry: AgentRegistry,
    gateway: Box<dyn BackendGateway>,
    router: Box<dyn SurfaceRouter>,
}

impl Orchestrator {
    pub fn new(
        registry: AgentRegistry,
        gateway: Box<dyn BackendGateway>,
        router: Box<dyn SurfaceRouter>,
    ) -> Self {
        Self {
            registry,
            gateway,
            router,
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// The gateway, for refinement loops driven by editor dialogs.
    pub fn gateway(&self) -> &dyn BackendGateway {
        self.gateway.as_ref()
    }

    /// Open a conversation with `agent_id`, or the default agent.
    pub fn open_session(&self, agent_id: Option<&str>) -> ConversationSession {
        let descriptor = self.registry.resolve(agent_id);
        info!(agent_id = %descriptor.id, "session opened");
        ConversationSession::new(descriptor)
    }

    pub fn descriptor(&self, session: &ConversationSession) -> &AgentDescriptor {
        self.registry.resolve(Some(session.agent_id().as_str()))
    }

    /// Actions to offer while the conversation is still empty.
    pub fn welcome_actions(&self, session: &ConversationSession) -> &[Action] {
        if !session.messages().is_empty() {
            return &[];
        }
        &self.descriptor(session).welcome_actions
    }

    /// The user submitted text.
    pub fn submit_text(&self, session: &mut ConversationSession, text: &str) -> TurnOutcome {
        if session.stage().is_some() {
            SolutionDiscovery::new(self.gateway.as_ref(), self.router.as_ref())
                .submit(session, text)
        } else {
            FreeformHandler::new(&self.registry, self.gateway.as_ref()).submit(session, text)
        }
    }

    /// The user invoked an action.
    pub fn invoke_action(&self, session: &mut ConversationSession, action: &Action) -> TurnOutcome {
        Dispatcher::new(&self.registry, self.gateway.as_ref(), self.router.as_ref())
            .dispatch(session, action)
    }

    /// The user switched agents. Returns `true` if the session was reset.
    pub fn switch_agent(&self, session: &mut ConversationSession, agent_id: Option<&str>) -> bool {
        let descriptor = self.registry.resolve(agent_id);
        let from = session.agent_id().clone();
        let switched = session.switch_to(descriptor);
        if switched {
            info!(from = %from, to = %descriptor.id, "agent switched, session reset");
        }
        switched
    }
}
