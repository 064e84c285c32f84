//! The freeform turn handler: one user turn, one backend call, one reply.
//!
//! A turn runs in two halves. `begin` records the user message, marks the
//! session pending and appends a placeholder; `finish` settles that
//! placeholder with the reply or an error. Between the two the caller is
//! free to block on the gateway. `submit` runs both halves back to back.

use serde_json::Value;
use tracing::{debug, info, warn};

use mygo_contracts::{
    action::{Action, ActionKind, Emphasis},
    agent::AgentDescriptor,
    error::MygoResult,
    message::{MessageId, NewMessage},
    outcome::{RejectReason, TurnOutcome},
    request::AgentRequest,
};

use crate::{
    registry::AgentRegistry,
    reply::reply_text,
    session::{CallTicket, ConversationSession},
    traits::BackendGateway,
};

/// Shown in place of a reply when the backend call fails.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// A freeform turn whose backend call has not settled yet.
#[derive(Debug)]
pub struct PendingTurn {
    ticket: CallTicket,
    placeholder: MessageId,
    request: AgentRequest,
    follow_ups: Vec<Action>,
}

impl PendingTurn {
    pub fn request(&self) -> &AgentRequest {
        &self.request
    }

    pub fn ticket(&self) -> &CallTicket {
        &self.ticket
    }
}

pub struct FreeformHandler<'a> {
    registry: &'a AgentRegistry,
    gateway: &'a dyn BackendGateway,
}

impl<'a> FreeformHandler<'a> {
    pub fn new(registry: &'a AgentRegistry, gateway: &'a dyn BackendGateway) -> Self {
        Self { registry, gateway }
    }

    /// Start a turn. Nothing in the session changes when it is rejected.
    pub fn begin(
        &self,
        session: &mut ConversationSession,
        text: &str,
    ) -> Result<PendingTurn, RejectReason> {
        if text.trim().is_empty() {
            debug!(agent_id = %session.agent_id(), "empty input rejected");
            return Err(RejectReason::EmptyInput);
        }
        if session.is_pending() {
            debug!(agent_id = %session.agent_id(), "input rejected, call already pending");
            return Err(RejectReason::CallPending);
        }

        let descriptor = self.registry.resolve(Some(session.agent_id().as_str()));
        // Agents without a freeform shape are answered by the knowledge assistant.
        let request = descriptor.shape.build(text).unwrap_or_else(|| AgentRequest::Ask {
            query: text.to_string(),
        });
        let follow_ups = follow_ups(descriptor);

        session.append(NewMessage::user(text));
        let ticket = session.begin_call().ok_or(RejectReason::CallPending)?;
        session.set_input_draft("");
        let placeholder = session.append_pending();

        debug!(
            agent_id = %session.agent_id(),
            operation = request.operation().name(),
            "freeform turn started"
        );

        Ok(PendingTurn {
            ticket,
            placeholder,
            request,
            follow_ups,
        })
    }

    /// Settle a turn with the gateway's result.
    ///
    /// A turn whose conversation was reset or switched away is discarded
    /// without touching the session.
    pub fn finish(
        &self,
        session: &mut ConversationSession,
        turn: PendingTurn,
        result: MygoResult<Value>,
    ) -> TurnOutcome {
        if !session.is_current(&turn.ticket) {
            info!(
                agent_id = %turn.ticket.agent_id(),
                active_agent = %session.agent_id(),
                "discarding response for an abandoned conversation"
            );
            return TurnOutcome::Discarded;
        }

        let operation = turn.request.operation();
        let (message, outcome) = match result {
            Ok(body) => {
                let text = reply_text(&body, operation);
                (
                    NewMessage::assistant(text).with_actions(turn.follow_ups),
                    TurnOutcome::Completed { messages: 1 },
                )
            }
            Err(e) => {
                warn!(
                    agent_id = %session.agent_id(),
                    operation = operation.name(),
                    error = %e,
                    "freeform call failed"
                );
                (
                    NewMessage::error(ERROR_REPLY),
                    TurnOutcome::Failed {
                        reason: e.to_string(),
                    },
                )
            }
        };

        session.settle(turn.placeholder, message);
        session.finish_call(&turn.ticket);
        outcome
    }

    /// Run a whole turn against the gateway.
    pub fn submit(&self, session: &mut ConversationSession, text: &str) -> TurnOutcome {
        let turn = match self.begin(session, text) {
            Ok(turn) => turn,
            Err(reason) => return TurnOutcome::rejected(reason),
        };
        let result = self.gateway.invoke(turn.request());
        self.finish(session, turn, result)
    }
}

fn follow_ups(descriptor: &AgentDescriptor) -> Vec<Action> {
    if !descriptor.full_editor {
        return Vec::new();
    }
    vec![Action::new(
        ActionKind::OpenEditor,
        format!("Open full {} editor", descriptor.name),
        Emphasis::Outline,
    )]
}
