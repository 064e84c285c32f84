//! The action dispatcher.
//!
//! Invoking an action produces exactly one of: a backend call whose outcome
//! is reported as a new assistant message, a local state change, or a
//! request to open another surface. Unknown actions are ignored.

use tracing::{debug, info, warn};

use mygo_contracts::{
    action::{Action, ActionKind, Emphasis},
    agent::Surface,
    error::MygoResult,
    gateway::{SyncReport, SyncScope},
    message::{MessageStatus, NewMessage},
    outcome::{RejectReason, TurnOutcome},
};

use crate::{
    registry::AgentRegistry,
    session::ConversationSession,
    traits::{BackendGateway, SurfaceRouter},
    workflow::SolutionDiscovery,
};

/// Upper bound on drill-down actions attached to one message.
pub const MAX_FOLLOW_UPS: usize = 8;

pub const NO_SOURCES: &str =
    "No document sources are configured. Configure a source in Settings to start syncing.";

pub struct Dispatcher<'a> {
    registry: &'a AgentRegistry,
    gateway: &'a dyn BackendGateway,
    router: &'a dyn SurfaceRouter,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a AgentRegistry,
        gateway: &'a dyn BackendGateway,
        router: &'a dyn SurfaceRouter,
    ) -> Self {
        Self {
            registry,
            gateway,
            router,
        }
    }

    pub fn dispatch(&self, session: &mut ConversationSession, action: &Action) -> TurnOutcome {
        if action.kind == ActionKind::Unknown {
            debug!(action_id = %action.id, "ignoring unknown action");
            return TurnOutcome::Ignored;
        }
        if session.is_pending() {
            debug!(action_id = %action.id, "action rejected, call already pending");
            return TurnOutcome::rejected(RejectReason::CallPending);
        }

        debug!(agent_id = %session.agent_id(), action_id = %action.id, "dispatching action");

        let workflow = SolutionDiscovery::new(self.gateway, self.router);
        match &action.kind {
            ActionKind::OpenEditor => {
                let descriptor = self.registry.resolve(Some(session.agent_id().as_str()));
                self.router
                    .request_surface(Surface::FullEditor(descriptor.id.clone()));
                session.append(NewMessage::info(format!(
                    "Opening the full {} editor...",
                    descriptor.name
                )));
                TurnOutcome::Completed { messages: 1 }
            }
            ActionKind::OpenSettings => {
                self.router.request_surface(Surface::Settings);
                session.append(NewMessage::info("Opening source settings..."));
                TurnOutcome::Completed { messages: 1 }
            }
            ActionKind::Suggestion => {
                session.set_input_draft(action.label.clone());
                TurnOutcome::DraftUpdated
            }
            ActionKind::ListSources => {
                self.with_call(session, "Error listing document sources.", list_sources)
            }
            ActionKind::SyncSource { source_id } => {
                let scope = SyncScope::source(source_id.clone());
                self.with_call(session, "Error syncing the source.", |gw| {
                    sync_one(gw, &scope, &format!("source {}", source_id))
                })
            }
            ActionKind::SyncProject {
                source_id,
                project_id,
            } => {
                let scope = SyncScope::project(source_id.clone(), project_id.clone());
                self.with_call(session, "Error syncing the project.", |gw| {
                    sync_one(gw, &scope, &format!("project {}", project_id))
                })
            }
            ActionKind::SyncAll => {
                self.with_call(session, "Error syncing document sources.", sync_all)
            }
            ActionKind::SyncConnected => {
                self.with_call(session, "Error syncing from Cloud ALM.", sync_connected)
            }
            ActionKind::SearchSimilar => workflow.search_similar(session),
            ActionKind::ProceedToSpec => workflow.proceed_to_spec(session),
            ActionKind::CreateSpec => workflow.create_spec(session),
            ActionKind::Unknown => TurnOutcome::Ignored,
        }
    }

    /// Run one guarded backend step and append whatever it reports.
    fn with_call<F>(&self, session: &mut ConversationSession, failure: &str, call: F) -> TurnOutcome
    where
        F: FnOnce(&dyn BackendGateway) -> MygoResult<NewMessage>,
    {
        let Some(ticket) = session.begin_call() else {
            return TurnOutcome::rejected(RejectReason::CallPending);
        };

        let outcome = match call(self.gateway) {
            Ok(message) => {
                session.append(message);
                TurnOutcome::Completed { messages: 1 }
            }
            Err(e) => {
                warn!(agent_id = %session.agent_id(), error = %e, "action call failed");
                session.append(NewMessage::error(format!("{} Please try again.", failure)));
                TurnOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        session.finish_call(&ticket);
        outcome
    }
}

// ── Source sync steps ────────────────────────────────────────────────────────

fn list_sources(gateway: &dyn BackendGateway) -> MygoResult<NewMessage> {
    let sources = gateway.list_sources()?;
    if sources.is_empty() {
        return Ok(NewMessage::assistant(NO_SOURCES));
    }

    let lines: Vec<String> = sources
        .iter()
        .map(|s| {
            format!(
                "- {} ({}) - {}",
                s.name,
                s.source_type,
                s.status.as_deref().unwrap_or("unknown")
            )
        })
        .collect();
    let actions = sources
        .iter()
        .take(MAX_FOLLOW_UPS)
        .map(|s| {
            Action::new(
                ActionKind::SyncSource {
                    source_id: s.id.clone(),
                },
                format!("Sync {}", s.name),
                Emphasis::Outline,
            )
        })
        .collect();

    Ok(NewMessage::assistant(format!(
        "Found {} document source(s):\n\n{}",
        sources.len(),
        lines.join("\n")
    ))
    .with_actions(actions))
}

fn sync_one(
    gateway: &dyn BackendGateway,
    scope: &SyncScope,
    target: &str,
) -> MygoResult<NewMessage> {
    let report = gateway.sync_source(scope)?;
    info!(
        source_id = %scope.source_id,
        synced = report.synced,
        skipped = report.skipped,
        failed = report.failed,
        "sync finished"
    );
    if report.total() == 0 {
        return Ok(NewMessage::info(format!(
            "Nothing to sync: no documents were found in {}.",
            target
        )));
    }
    Ok(report_message(&format!("Sync of {} finished", target), report))
}

fn sync_all(gateway: &dyn BackendGateway) -> MygoResult<NewMessage> {
    let sources = gateway.list_sources()?;
    if sources.is_empty() {
        return Ok(NewMessage::assistant(NO_SOURCES));
    }

    // A source that fails as a whole counts as one failed item.
    let mut total = SyncReport::default();
    let mut failed_sources: Vec<&str> = Vec::new();
    let mut first_error = None;
    for source in &sources {
        match gateway.sync_source(&SyncScope::source(source.id.clone())) {
            Ok(report) => total.merge(report),
            Err(e) => {
                warn!(source_id = %source.id, error = %e, "source sync failed");
                failed_sources.push(&source.name);
                total.failed += 1;
                first_error.get_or_insert(e);
            }
        }
    }
    if failed_sources.len() == sources.len() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    let heading = format!("Synced {} source(s)", sources.len() - failed_sources.len());
    let mut message = report_message(&heading, total);
    if !failed_sources.is_empty() {
        message.content.push_str(&format!(
            "\n\nCould not sync: {}.",
            failed_sources.join(", ")
        ));
        message.status = Some(MessageStatus::Info);
    }
    Ok(message)
}

fn sync_connected(gateway: &dyn BackendGateway) -> MygoResult<NewMessage> {
    let sources = gateway.list_sources()?;
    let Some(source) = sources.iter().find(|s| s.is_connected_system()) else {
        return Ok(NewMessage::assistant(
            "No Cloud ALM source is configured. Connect one in Settings to sync its projects.",
        )
        .with_actions(vec![Action::new(
            ActionKind::OpenSettings,
            "Open settings",
            Emphasis::Primary,
        )]));
    };

    let projects = gateway.list_projects(&source.id)?;
    if projects.is_empty() {
        return Ok(NewMessage::assistant(format!(
            "No projects were found in {}.",
            source.name
        )));
    }

    let mut content = format!(
        "Found {} project(s) in {}. Choose one to sync",
        projects.len(),
        source.name
    );
    if projects.len() > MAX_FOLLOW_UPS {
        content.push_str(&format!(" (showing the first {})", MAX_FOLLOW_UPS));
    }
    content.push(':');

    let actions = projects
        .iter()
        .take(MAX_FOLLOW_UPS)
        .map(|p| {
            Action::new(
                ActionKind::SyncProject {
                    source_id: source.id.clone(),
                    project_id: p.id.clone(),
                },
                p.name.clone(),
                Emphasis::Outline,
            )
        })
        .collect();
    Ok(NewMessage::assistant(content).with_actions(actions))
}

fn report_message(heading: &str, report: SyncReport) -> NewMessage {
    NewMessage::assistant(format!(
        "{}: {} synced, {} skipped, {} failed.",
        heading, report.synced, report.skipped, report.failed
    ))
    .with_status(MessageStatus::Success)
}
