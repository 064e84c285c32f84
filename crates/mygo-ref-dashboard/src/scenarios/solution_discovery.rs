//! Scenario 1: Solution Discovery
//!
//! Drives the solution advisor through every stage of its workflow:
//!
//!   1. A too-short requirement triggers a clarification round
//!   2. The clarified requirements chain straight into a first proposal
//!   3. Free-text feedback replaces the proposal in place
//!   4. "Search similar solutions" finds prior art and moves to improvise
//!   5. An improvise instruction produces the final solution
//!   6. "Create functional spec" hands off to spec creation and resets
//!
//! Sub-case B repeats the search step with the prior-art lookup down, which
//! still moves the workflow on to improvise.

use mygo_contracts::{
    action::ActionKind,
    agent::Surface,
    error::MygoResult,
    request::Operation,
};
use mygo_core::ConversationSession;

use super::{print_new, print_outcome, require_action, Dashboard};

pub const AGENT_ID: &str = "solution-advisor";
pub const FIRST_ANSWER: &str = "Customer returns workflow";
pub const CLARIFIED: &str =
    "Plants 1000 and 2000, refund only after a quality inspection of the returned goods";
pub const FEEDBACK: &str = "Add a credit block for returns above 5000 EUR";
pub const INSTRUCTION: &str = "Adopt the inspection lot approach from the first match";

fn print_stage(session: &ConversationSession) {
    if let Some(stage) = session.stage() {
        println!("  -- stage {}/5: {} --", stage.index() + 1, stage.label());
    }
}

/// Walk a fresh advisor session up to the `solution` stage.
pub fn reach_solution(dash: &Dashboard, seen: &mut usize) -> ConversationSession {
    let o = &dash.orchestrator;
    let mut session = o.open_session(Some(AGENT_ID));
    print_stage(&session);

    print_outcome(&o.submit_text(&mut session, FIRST_ANSWER));
    print_new(&session, seen);
    print_stage(&session);

    print_outcome(&o.submit_text(&mut session, CLARIFIED));
    print_new(&session, seen);
    print_stage(&session);
    session
}

/// Run Scenario 1: Solution Discovery.
pub fn run_scenario() -> MygoResult<()> {
    println!("=== Scenario 1: Solution Discovery ===");
    println!();

    let dash = Dashboard::with_default_fixture()?;
    let o = &dash.orchestrator;
    let mut seen = 0;

    println!("  Sub-case A: full workflow");
    let mut session = reach_solution(&dash, &mut seen);

    print_outcome(&o.submit_text(&mut session, FEEDBACK));
    print_new(&session, &mut seen);

    let search = require_action(&session, &ActionKind::SearchSimilar)?;
    print_outcome(&o.invoke_action(&mut session, &search));
    print_new(&session, &mut seen);
    print_stage(&session);

    print_outcome(&o.submit_text(&mut session, INSTRUCTION));
    print_new(&session, &mut seen);
    print_stage(&session);

    let rejected = o.submit_text(&mut session, "One more change, please");
    println!("  Text after completion: {:?}", rejected);

    let create = require_action(&session, &ActionKind::CreateSpec)?;
    print_outcome(&o.invoke_action(&mut session, &create));
    match dash.router.last() {
        Some(Surface::SpecCreation { solution }) => {
            println!(
                "  Spec creation opened with a {}-line solution; workflow reset to '{}'",
                solution.lines().count(),
                session.stage().map(|s| s.label()).unwrap_or("-")
            );
        }
        other => println!("  Unexpected surface: {:?}", other),
    }
    println!();

    println!("  Sub-case B: prior-art search unavailable");
    let mut seen = 0;
    let mut session = reach_solution(&dash, &mut seen);
    dash.gateway.fail(Operation::SearchSimilar);
    let search = require_action(&session, &ActionKind::SearchSimilar)?;
    print_outcome(&o.invoke_action(&mut session, &search));
    print_new(&session, &mut seen);
    print_stage(&session);
    dash.gateway.recover(Operation::SearchSimilar);

    println!();
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}
