//! The staged workflow engine for solution discovery.
//!
//! ```text
//! requirements ──▶ solution ──▶ search ──▶ improvise ──▶ complete
//!      ▲  │            │  ▲                                 ▲
//!      └──┘            └──┘ refine                          │
//!   clarify            └────────── proceed to spec ─────────┘
//! ```
//!
//! Stages never move backwards. `search` always advances to `improvise`,
//! even when the lookup fails. `complete` only leaves through `create_spec`,
//! which hands the solution to the spec creation surface and resets the
//! session.

use tracing::{debug, info, warn};

use mygo_contracts::{
    action::{Action, ActionKind, Emphasis},
    agent::Surface,
    gateway::{ImproviseRequest, RefineSolutionRequest, SimilarSolution},
    message::{MessageStatus, NewMessage},
    outcome::{RejectReason, TurnOutcome},
    stage::Stage,
};

use crate::{
    session::{ConversationSession, Discovery},
    traits::{BackendGateway, SurfaceRouter},
};

const REQUIREMENTS_ACK: &str =
    "Thank you for the requirements. Let me generate a solution proposal for you.";
const IMPROVISE_ACK: &str = "I've incorporated your feedback. Here is the final solution:";
const NO_SIMILAR: &str = "No similar solutions were found in the knowledge base. \
Tell me how you would like to finalize the proposal, or reply \"keep it as is\".";

pub struct SolutionDiscovery<'a> {
    gateway: &'a dyn BackendGateway,
    router: &'a dyn SurfaceRouter,
}

impl<'a> SolutionDiscovery<'a> {
    pub fn new(gateway: &'a dyn BackendGateway, router: &'a dyn SurfaceRouter) -> Self {
        Self { gateway, router }
    }

    /// Handle free text in the current stage.
    pub fn submit(&self, session: &mut ConversationSession, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            return TurnOutcome::rejected(RejectReason::EmptyInput);
        }
        let Some(stage) = session.stage() else {
            debug!(agent_id = %session.agent_id(), "no workflow for this agent");
            return TurnOutcome::Ignored;
        };
        if session.is_pending() {
            return TurnOutcome::rejected(RejectReason::CallPending);
        }
        if !stage.accepts_text() {
            debug!(stage = %stage, "free text rejected in this stage");
            return TurnOutcome::rejected(RejectReason::StageClosed { stage });
        }

        session.append(NewMessage::user(text));
        session.set_input_draft("");
        let Some(ticket) = session.begin_call() else {
            return TurnOutcome::rejected(RejectReason::CallPending);
        };

        let outcome = match stage {
            Stage::Requirements => self.submit_requirements(session, text),
            Stage::Solution => self.refine_solution(session, text),
            _ => self.improvise(session, text),
        };

        session.finish_call(&ticket);
        outcome
    }

    /// Look up prior art for the current proposal, then move on to `improvise`.
    pub fn search_similar(&self, session: &mut ConversationSession) -> TurnOutcome {
        if let Some(rejected) = self.guard(session, Stage::Solution, ActionKind::SearchSimilar) {
            return rejected;
        }
        let Some(ticket) = session.begin_call() else {
            return TurnOutcome::rejected(RejectReason::CallPending);
        };
        let proposal = snapshot(session).proposal.unwrap_or_default();
        advance(session, Stage::Search);

        let outcome = match self.gateway.search_similar(&proposal) {
            Ok(matches) => {
                let content = if matches.is_empty() {
                    NO_SIMILAR.to_string()
                } else {
                    format!(
                        "I found {} similar solution(s):\n\n{}\n\n\
                         How would you like to incorporate these into the proposal?",
                        matches.len(),
                        render_prior_art(&matches)
                    )
                };
                if let Some(d) = session.discovery_mut() {
                    d.prior_art = matches;
                }
                session.append(NewMessage::assistant(content));
                TurnOutcome::Completed { messages: 1 }
            }
            Err(e) => {
                warn!(error = %e, "similar solution search failed, continuing without it");
                session.append(NewMessage::error(
                    "Error searching for similar solutions. \
                     Tell me how you would like to finalize the proposal.",
                ));
                TurnOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        advance(session, Stage::Improvise);
        session.finish_call(&ticket);
        outcome
    }

    /// Accept the current proposal as final, skipping search and improvise.
    pub fn proceed_to_spec(&self, session: &mut ConversationSession) -> TurnOutcome {
        if let Some(rejected) = self.guard(session, Stage::Solution, ActionKind::ProceedToSpec) {
            return rejected;
        }
        let proposal = snapshot(session).proposal.unwrap_or_default();
        complete(session, proposal, "The solution is finalized and ready for a functional spec.");
        TurnOutcome::Completed { messages: 1 }
    }

    /// Hand the final solution to spec creation and discard the workflow.
    pub fn create_spec(&self, session: &mut ConversationSession) -> TurnOutcome {
        if let Some(rejected) = self.guard(session, Stage::Complete, ActionKind::CreateSpec) {
            return rejected;
        }
        let d = snapshot(session);
        let solution = d.final_solution.or(d.proposal).unwrap_or_default();
        info!(agent_id = %session.agent_id(), "handing final solution to spec creation");
        self.router.request_surface(Surface::SpecCreation { solution });
        session.reset();
        TurnOutcome::Completed { messages: 0 }
    }

    fn guard(
        &self,
        session: &ConversationSession,
        required: Stage,
        kind: ActionKind,
    ) -> Option<TurnOutcome> {
        if session.is_pending() {
            return Some(TurnOutcome::rejected(RejectReason::CallPending));
        }
        if session.stage() == Some(required) {
            return None;
        }
        let action_id = kind.canonical_id().unwrap_or_default();
        debug!(action_id = %action_id, stage = ?session.stage(), "workflow action unavailable");
        Some(TurnOutcome::rejected(RejectReason::ActionUnavailable {
            action_id,
        }))
    }

    // ── Stage handlers ───────────────────────────────────────────────────────

    // Requirements are committed only once the backend accepted them.
    fn submit_requirements(&self, session: &mut ConversationSession, text: &str) -> TurnOutcome {
        let prior = snapshot(session).requirements;
        let requirements = if prior.is_empty() {
            text.to_string()
        } else {
            format!("{}\n\n{}", prior, text)
        };

        let review = match self.gateway.submit_requirements(&requirements) {
            Ok(review) => review,
            Err(e) => {
                return fail(session, "Error processing requirements. Please try again.", e)
            }
        };
        if let Some(d) = session.discovery_mut() {
            d.requirements = requirements.clone();
        }

        let reply = review
            .clarifications
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| REQUIREMENTS_ACK.to_string());
        session.append(NewMessage::assistant(reply));

        if review.needs_clarification {
            debug!("clarification requested, staying in requirements");
            return TurnOutcome::Completed { messages: 1 };
        }

        match self.gateway.generate_solution(&requirements) {
            Ok(proposal) if !proposal.solution.trim().is_empty() => {
                propose(session, "Proposed Solution", proposal.solution);
                advance(session, Stage::Solution);
                TurnOutcome::Completed { messages: 2 }
            }
            Ok(_) => {
                session.append(NewMessage::error(
                    "The advisor returned an empty proposal. Please add more detail.",
                ));
                TurnOutcome::Failed {
                    reason: "empty solution proposal".to_string(),
                }
            }
            Err(e) => fail(session, "Error generating solution. Please try again.", e),
        }
    }

    fn refine_solution(&self, session: &mut ConversationSession, feedback: &str) -> TurnOutcome {
        let d = snapshot(session);
        let request = RefineSolutionRequest {
            requirements: d.requirements,
            current_solution: d.proposal.unwrap_or_default(),
            feedback: feedback.to_string(),
        };
        match self.gateway.refine_solution(&request) {
            Ok(proposal) if !proposal.solution.trim().is_empty() => {
                propose(session, "Updated Solution", proposal.solution);
                TurnOutcome::Completed { messages: 1 }
            }
            Ok(_) => {
                session.append(NewMessage::error(
                    "The advisor returned an empty proposal. The previous one is unchanged.",
                ));
                TurnOutcome::Failed {
                    reason: "empty solution proposal".to_string(),
                }
            }
            Err(e) => fail(session, "Error refining solution. Please try again.", e),
        }
    }

    fn improvise(&self, session: &mut ConversationSession, instruction: &str) -> TurnOutcome {
        let d = snapshot(session);
        let current = d.proposal.unwrap_or_default();
        let request = ImproviseRequest {
            requirements: d.requirements,
            current_solution: current.clone(),
            similar_solutions: d
                .prior_art
                .iter()
                .map(|s| s.summary.clone())
                .collect(),
            user_input: instruction.to_string(),
        };
        match self.gateway.improvise(&request) {
            Ok(improvised) => {
                let solution = improvised
                    .final_solution
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(current);
                let lead = improvised
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| IMPROVISE_ACK.to_string());
                complete(session, solution, &lead);
                TurnOutcome::Completed { messages: 1 }
            }
            Err(e) => fail(session, "Error finalizing the solution. Please try again.", e),
        }
    }
}

/// The numbered prior-art listing, highest relevance first as returned.
pub fn render_prior_art(matches: &[SimilarSolution]) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "{}. **{}** ({}% relevant)\n   {}",
                i + 1,
                m.title,
                m.relevance_percent(),
                m.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn snapshot(session: &ConversationSession) -> Discovery {
    session.discovery().cloned().unwrap_or_default()
}

fn advance(session: &mut ConversationSession, to: Stage) {
    if let Some(d) = session.discovery_mut() {
        if to > d.stage {
            info!(from = %d.stage, to = %to, "workflow stage advanced");
            d.stage = to;
        }
    }
}

fn propose(session: &mut ConversationSession, heading: &str, solution: String) {
    let content = format!("**{}**\n\n{}", heading, solution);
    if let Some(d) = session.discovery_mut() {
        d.proposal = Some(solution);
    }
    session.append(NewMessage::assistant(content).with_actions(vec![
        Action::new(
            ActionKind::SearchSimilar,
            "Search similar solutions",
            Emphasis::Primary,
        ),
        Action::new(ActionKind::ProceedToSpec, "Proceed to spec", Emphasis::Secondary),
    ]));
}

fn complete(session: &mut ConversationSession, solution: String, lead: &str) {
    let content = format!("{}\n\n{}", lead, solution);
    if let Some(d) = session.discovery_mut() {
        d.final_solution = Some(solution);
    }
    advance(session, Stage::Complete);
    session.append(
        NewMessage::assistant(content)
            .with_status(MessageStatus::Success)
            .with_actions(vec![Action::new(
                ActionKind::CreateSpec,
                "Create functional spec",
                Emphasis::Primary,
            )]),
    );
}

fn fail(
    session: &mut ConversationSession,
    text: &str,
    error: mygo_contracts::error::MygoError,
) -> TurnOutcome {
    warn!(stage = ?session.stage(), error = %error, "workflow call failed, stage unchanged");
    session.append(NewMessage::error(text));
    TurnOutcome::Failed {
        reason: error.to_string(),
    }
}
