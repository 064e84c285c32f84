//! Scenario 2: Document Sync
//!
//! Exercises the sync agent's welcome actions against the fixture sources:
//! listing sources, syncing everything, picking a Cloud ALM project, and an
//! empty dashboard with no sources at all.
//!
//! Sub-case C starts a knowledge-assistant turn, switches agents while the
//! call is in flight, and shows the late reply being dropped.

use mygo_contracts::{
    action::{Action, ActionKind},
    error::MygoResult,
    outcome::TurnOutcome,
};
use mygo_core::freeform::FreeformHandler;

use super::{find_action, print_new, print_outcome, require_action, Dashboard};
use crate::gateway::DashboardFixture;

pub const AGENT_ID: &str = "sync-documents";
pub const DRILL_DOWN_PROJECT: &str = "PRJ-103";

fn welcome(dash: &Dashboard, kind: &ActionKind) -> Option<Action> {
    let session = dash.orchestrator.open_session(Some(AGENT_ID));
    dash.orchestrator
        .welcome_actions(&session)
        .iter()
        .find(|a| &a.kind == kind)
        .cloned()
}

/// Run Scenario 2: Document Sync.
pub fn run_scenario() -> MygoResult<()> {
    println!("=== Scenario 2: Document Sync ===");
    println!();

    let dash = Dashboard::with_default_fixture()?;
    let o = &dash.orchestrator;

    println!("  Sub-case A: configured sources");
    let mut session = o.open_session(Some(AGENT_ID));
    let mut seen = 0;
    let welcome_actions = o.welcome_actions(&session).to_vec();
    for action in &welcome_actions {
        println!("  Welcome action: {} ({})", action.label, action.id);
    }

    for action in &welcome_actions {
        print_outcome(&o.invoke_action(&mut session, action));
        print_new(&session, &mut seen);
    }

    let project = find_action(
        &session,
        &ActionKind::SyncProject {
            source_id: "calm-main".to_string(),
            project_id: DRILL_DOWN_PROJECT.to_string(),
        },
    );
    match project {
        Some(action) => {
            print_outcome(&o.invoke_action(&mut session, &action));
            print_new(&session, &mut seen);
        }
        None => println!("  Project {} was not offered", DRILL_DOWN_PROJECT),
    }

    let source = require_action(
        &session,
        &ActionKind::SyncSource {
            source_id: "sp-projects".to_string(),
        },
    )?;
    print_outcome(&o.invoke_action(&mut session, &source));
    print_new(&session, &mut seen);
    println!();

    println!("  Sub-case B: empty dashboard");
    let empty = Dashboard::new(DashboardFixture::default());
    let mut session = empty.orchestrator.open_session(Some(AGENT_ID));
    let mut seen = 0;
    if let Some(sync_all) = welcome(&empty, &ActionKind::SyncAll) {
        print_outcome(&empty.orchestrator.invoke_action(&mut session, &sync_all));
        print_new(&session, &mut seen);
    }
    println!();

    println!("  Sub-case C: reply after an agent switch");
    let outcome = stale_reply(&dash);
    print_outcome(&outcome);

    println!();
    println!("  Scenario 2 complete.");
    println!();
    Ok(())
}

/// Start a knowledge-assistant turn, switch to the sync agent before the
/// reply is applied, then apply it.
pub fn stale_reply(dash: &Dashboard) -> TurnOutcome {
    let o = &dash.orchestrator;
    let handler = FreeformHandler::new(o.registry(), o.gateway());
    let mut session = o.open_session(None);

    let turn = match handler.begin(&mut session, "What does clean core mean?") {
        Ok(turn) => turn,
        Err(reason) => return TurnOutcome::rejected(reason),
    };
    println!(
        "  Turn started on '{}'; {} message(s) shown",
        turn.ticket().agent_id(),
        session.messages().len()
    );

    o.switch_agent(&mut session, Some(AGENT_ID));
    println!("  Switched to '{}'", session.agent_id());

    let reply = o.gateway().invoke(turn.request());
    let outcome = handler.finish(&mut session, turn, reply);
    println!(
        "  Late reply applied; '{}' shows {} message(s)",
        session.agent_id(),
        session.messages().len()
    );
    outcome
}
