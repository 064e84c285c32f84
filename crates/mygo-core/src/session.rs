//! Conversation session state.
//!
//! A session belongs to exactly one active agent at a time. Changing the
//! agent resets it wholesale: no messages, draft or stage survive a switch.
//! Every reset bumps an epoch, so a call started before the reset can be
//! told apart from one started after it even if the user switched back to
//! the same agent in between.

use mygo_contracts::{
    agent::{AgentDescriptor, AgentId},
    gateway::SimilarSolution,
    message::{Message, MessageId, NewMessage},
    stage::Stage,
};

use crate::log::{MessageLog, Settlement};

/// Captured when a backend call starts; checked when it settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTicket {
    agent_id: AgentId,
    epoch: u64,
}

impl CallTicket {
    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }
}

/// Working state of the solution discovery workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub(crate) stage: Stage,
    /// Accumulated requirements, one paragraph per accepted answer.
    pub(crate) requirements: String,
    pub(crate) proposal: Option<String>,
    pub(crate) prior_art: Vec<SimilarSolution>,
    pub(crate) final_solution: Option<String>,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            stage: Stage::Requirements,
            requirements: String::new(),
            proposal: None,
            prior_art: Vec::new(),
            final_solution: None,
        }
    }
}

impl Discovery {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    pub fn proposal(&self) -> Option<&str> {
        self.proposal.as_deref()
    }

    pub fn prior_art(&self) -> &[SimilarSolution] {
        &self.prior_art
    }

    pub fn final_solution(&self) -> Option<&str> {
        self.final_solution.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct ConversationSession {
    agent_id: AgentId,
    log: MessageLog,
    input_draft: String,
    pending: bool,
    epoch: u64,
    discovery: Option<Discovery>,
}

impl ConversationSession {
    pub fn new(descriptor: &AgentDescriptor) -> Self {
        Self {
            agent_id: descriptor.id.clone(),
            log: MessageLog::new(),
            input_draft: String::new(),
            pending: false,
            epoch: 0,
            discovery: descriptor.is_staged().then(Discovery::default),
        }
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    pub fn messages(&self) -> &[Message] {
        self.log.all()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn input_draft(&self) -> &str {
        &self.input_draft
    }

    pub fn set_input_draft(&mut self, draft: impl Into<String>) {
        self.input_draft = draft.into();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The workflow stage, for the staged agent only.
    pub fn stage(&self) -> Option<Stage> {
        self.discovery.as_ref().map(|d| d.stage)
    }

    pub fn discovery(&self) -> Option<&Discovery> {
        self.discovery.as_ref()
    }

    /// Make `descriptor` the active agent.
    ///
    /// Returns `false` and leaves the session untouched when that agent is
    /// already active.
    pub fn switch_to(&mut self, descriptor: &AgentDescriptor) -> bool {
        if descriptor.id == self.agent_id {
            return false;
        }
        self.agent_id = descriptor.id.clone();
        self.discovery = descriptor.is_staged().then(Discovery::default);
        self.reset();
        true
    }

    /// Clear the log and draft, drop any outstanding call and restart the
    /// workflow from `requirements`.
    pub fn reset(&mut self) {
        self.log.clear();
        self.input_draft.clear();
        self.pending = false;
        self.epoch += 1;
        if let Some(discovery) = self.discovery.as_mut() {
            *discovery = Discovery::default();
        }
    }

    /// Mark a call as outstanding. `None` if one already is.
    pub fn begin_call(&mut self) -> Option<CallTicket> {
        if self.pending {
            return None;
        }
        self.pending = true;
        Some(CallTicket {
            agent_id: self.agent_id.clone(),
            epoch: self.epoch,
        })
    }

    /// Whether a call started with `ticket` still belongs to this conversation.
    pub fn is_current(&self, ticket: &CallTicket) -> bool {
        ticket.agent_id == self.agent_id && ticket.epoch == self.epoch
    }

    /// Settle the call started with `ticket`.
    ///
    /// Clears `pending` and returns `true` only when the ticket is current;
    /// a stale ticket never touches the newer conversation's state.
    pub fn finish_call(&mut self, ticket: &CallTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.pending = false;
        true
    }

    pub(crate) fn append(&mut self, message: NewMessage) -> MessageId {
        self.log.append(message)
    }

    pub(crate) fn append_pending(&mut self) -> MessageId {
        self.log.append_pending()
    }

    pub(crate) fn settle(&mut self, id: MessageId, message: NewMessage) -> Settlement {
        self.log.settle(id, message)
    }

    pub(crate) fn discovery_mut(&mut self) -> Option<&mut Discovery> {
        self.discovery.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AgentRegistry, SOLUTION_ADVISOR_ID};

    fn session_for(id: &str) -> (AgentRegistry, ConversationSession) {
        let registry = AgentRegistry::builtin();
        let session = ConversationSession::new(registry.resolve(Some(id)));
        (registry, session)
    }

    #[test]
    fn only_the_staged_agent_has_a_stage() {
        let (registry, mut session) = session_for("ask-yoda");
        assert_eq!(session.stage(), None);

        session.switch_to(registry.resolve(Some(SOLUTION_ADVISOR_ID)));
        assert_eq!(session.stage(), Some(Stage::Requirements));
    }

    #[test]
    fn switching_clears_all_conversation_state() {
        let (registry, mut session) = session_for(SOLUTION_ADVISOR_ID);
        session.append(NewMessage::user("hello"));
        session.set_input_draft("half typed");
        if let Some(d) = session.discovery_mut() {
            d.stage = Stage::Improvise;
            d.requirements = "returns".to_string();
        }
        let _ticket = session.begin_call();

        assert!(session.switch_to(registry.resolve(Some("spec-assistant"))));
        assert!(session.messages().is_empty());
        assert_eq!(session.input_draft(), "");
        assert!(!session.is_pending());
        assert_eq!(session.stage(), None);

        assert!(session.switch_to(registry.resolve(Some(SOLUTION_ADVISOR_ID))));
        assert_eq!(session.stage(), Some(Stage::Requirements));
        assert_eq!(session.discovery().map(|d| d.requirements()), Some(""));
    }

    #[test]
    fn switching_to_the_active_agent_is_a_no_op() {
        let (registry, mut session) = session_for("ask-yoda");
        session.append(NewMessage::user("keep me"));
        assert!(!session.switch_to(registry.resolve(Some("ask-yoda"))));
        assert_eq!(session.messages().len(), 1);
    }

    // ── Call tickets ─────────────────────────────────────────────────────────

    #[test]
    fn only_one_call_may_be_outstanding() {
        let (_, mut session) = session_for("ask-yoda");
        let ticket = session.begin_call();
        assert!(ticket.is_some());
        assert!(session.begin_call().is_none());

        if let Some(ticket) = ticket {
            assert!(session.finish_call(&ticket));
        }
        assert!(!session.is_pending());
        assert!(session.begin_call().is_some());
    }

    #[test]
    fn ticket_goes_stale_after_a_round_trip_switch() {
        let (registry, mut session) = session_for("ask-yoda");
        let ticket = session.begin_call().unwrap();

        session.switch_to(registry.resolve(Some("explain-code")));
        session.switch_to(registry.resolve(Some("ask-yoda")));

        assert_eq!(ticket.agent_id(), session.agent_id());
        assert!(!session.is_current(&ticket));
        assert!(!session.finish_call(&ticket));
    }

    #[test]
    fn stale_ticket_does_not_clear_a_newer_call() {
        let (registry, mut session) = session_for("ask-yoda");
        let old = session.begin_call().unwrap();
        session.switch_to(registry.resolve(Some("code-advisor")));
        let _new = session.begin_call().unwrap();

        assert!(!session.finish_call(&old));
        assert!(session.is_pending());
    }
}
