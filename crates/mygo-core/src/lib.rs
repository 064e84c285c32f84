//! # mygo-core
//!
//! The conversational orchestration core of the MYGO agent dashboard.
//!
//! This crate defines:
//! - The `BackendGateway` and `SurfaceRouter` collaborator traits
//! - The agent registry and the per-conversation `ConversationSession`
//! - The freeform turn handler, the action dispatcher, the solution
//!   discovery workflow and the refinement loop
//! - The `Orchestrator` façade tying them together
//!
//! Gateway failures never escape this crate. They become error-status
//! assistant messages and are reported through the outcome enums in
//! `mygo_contracts::outcome`.

pub mod dispatcher;
pub mod freeform;
pub mod log;
pub mod orchestrator;
pub mod refinement;
pub mod registry;
pub mod reply;
pub mod session;
pub mod traits;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use orchestrator::Orchestrator;
pub use registry::AgentRegistry;
pub use session::ConversationSession;
pub use traits::{BackendGateway, SurfaceRouter};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use mygo_contracts::{
        action::{Action, ActionKind, Emphasis},
        gateway::{RequirementsReview, SolutionProposal},
        message::Role,
        outcome::{RejectReason, TurnOutcome},
        request::Operation,
        stage::Stage,
    };

    use super::*;
    use crate::testing::{MockGateway, RecordingRouter};

    fn orchestrator() -> (Orchestrator, Arc<MockGateway>, Arc<RecordingRouter>) {
        let gateway = Arc::new(MockGateway::new());
        let router = Arc::new(RecordingRouter::default());
        let orchestrator = Orchestrator::new(
            AgentRegistry::builtin(),
            Box::new(Arc::clone(&gateway)),
            Box::new(Arc::clone(&router)),
        );
        (orchestrator, gateway, router)
    }

    // ── Routing ──────────────────────────────────────────────────────────────

    #[test]
    fn unknown_agent_opens_the_default_chat() {
        let (orchestrator, _, _) = orchestrator();
        let session = orchestrator.open_session(Some("retired-agent"));
        assert_eq!(session.agent_id().as_str(), registry::DEFAULT_AGENT_ID);
        assert_eq!(orchestrator.welcome_actions(&session).len(), 3);
    }

    #[test]
    fn staged_agent_text_goes_to_the_workflow() {
        let (orchestrator, gateway, _) = orchestrator();
        let mut session = orchestrator.open_session(Some("solution-advisor"));
        gateway.push_requirements(Ok(RequirementsReview::default()));
        gateway.push_solution(Ok(SolutionProposal {
            solution: "Returns order type with QM".to_string(),
        }));

        let outcome = orchestrator.submit_text(&mut session, "We need a returns workflow");

        assert_eq!(outcome, TurnOutcome::Completed { messages: 2 });
        assert_eq!(session.stage(), Some(Stage::Solution));
        let assistants = session
            .messages()
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count();
        assert_eq!(assistants, 2);
    }

    #[test]
    fn sync_agent_text_goes_to_the_knowledge_assistant() {
        let (orchestrator, gateway, _) = orchestrator();
        let mut session = orchestrator.open_session(Some("sync-documents"));
        gateway.push_invoke(Ok(json!({ "answer": "Use Sync all." })));

        orchestrator.submit_text(&mut session, "How do I sync?");

        assert_eq!(gateway.calls(), vec![Operation::AskYoda]);
    }

    #[test]
    fn welcome_actions_disappear_once_the_chat_starts() {
        let (orchestrator, gateway, _) = orchestrator();
        let mut session = orchestrator.open_session(None);
        gateway.push_invoke(Ok(json!({ "answer": "hi" })));
        orchestrator.submit_text(&mut session, "hello");
        assert!(orchestrator.welcome_actions(&session).is_empty());
    }

    // ── Session invariants ───────────────────────────────────────────────────

    #[test]
    fn switching_always_empties_the_log_and_resets_the_stage() {
        let (orchestrator, gateway, _) = orchestrator();
        let mut session = orchestrator.open_session(Some("solution-advisor"));
        gateway.push_requirements(Ok(RequirementsReview::default()));
        gateway.push_solution(Ok(SolutionProposal {
            solution: "P".to_string(),
        }));
        orchestrator.submit_text(&mut session, "requirements");
        assert_eq!(session.stage(), Some(Stage::Solution));

        assert!(orchestrator.switch_agent(&mut session, Some("ask-yoda")));
        assert!(session.messages().is_empty());
        assert_eq!(session.stage(), None);

        assert!(orchestrator.switch_agent(&mut session, Some("solution-advisor")));
        assert!(session.messages().is_empty());
        assert_eq!(session.stage(), Some(Stage::Requirements));
    }

    #[test]
    fn nothing_goes_out_while_a_call_is_pending() {
        let (orchestrator, gateway, _) = orchestrator();
        let mut session = orchestrator.open_session(Some("sync-documents"));
        let _ticket = session.begin_call();

        let text = orchestrator.submit_text(&mut session, "question");
        let action = orchestrator.invoke_action(
            &mut session,
            &Action::new(ActionKind::SyncAll, "Sync all", Emphasis::Primary),
        );

        assert_eq!(text, TurnOutcome::rejected(RejectReason::CallPending));
        assert_eq!(action, TurnOutcome::rejected(RejectReason::CallPending));
        assert!(gateway.calls().is_empty());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn open_editor_names_the_active_agent() {
        let (orchestrator, gateway, router) = orchestrator();
        let mut session = orchestrator.open_session(Some("code-advisor"));
        gateway.push_invoke(Ok(json!({ "analysis": "Looks fine." })));
        orchestrator.submit_text(&mut session, "REPORT zdemo.");

        let action = session.messages()[1].actions[0].clone();
        orchestrator.invoke_action(&mut session, &action);

        assert_eq!(
            router.surfaces(),
            vec![mygo_contracts::agent::Surface::FullEditor(
                mygo_contracts::agent::AgentId::new("code-advisor")
            )]
        );
    }
}
