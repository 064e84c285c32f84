//! MYGO Agent Dashboard: Demo CLI
//!
//! Runs the dashboard walkthroughs against canned data, or opens an
//! interactive chat against a live backend (or the in-memory one).
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- solution-discovery
//!   cargo run -p demo -- document-sync
//!   cargo run -p demo -- refinement
//!   cargo run -p demo -- chat --base-url http://localhost:8000
//!   cargo run -p demo -- chat --config gateway.toml --agent sync-documents
//!   cargo run -p demo -- chat --offline

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mygo_contracts::{
    action::{Action, Emphasis},
    agent::Surface,
    error::{MygoError, MygoResult},
};
use mygo_core::{
    traits::{BackendGateway, SurfaceRouter},
    AgentRegistry, ConversationSession, Orchestrator,
};
use mygo_gateway::{GatewayConfig, HttpGateway};
use mygo_ref_dashboard::{
    scenarios::{document_sync, print_new, print_outcome, refinement, solution_discovery},
    InMemoryGateway,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// MYGO: conversational agent dashboard demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "MYGO agent dashboard demo",
    long_about = "Runs MYGO dashboard walkthroughs showing agent routing, the solution\n\
                  discovery workflow, document sync actions and artifact refinement."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three walkthroughs in sequence.
    RunAll,
    /// Scenario 1: Solution Discovery (staged workflow and spec handoff).
    SolutionDiscovery,
    /// Scenario 2: Document Sync (source actions and late replies).
    DocumentSync,
    /// Scenario 3: Artifact Refinement (refine and download).
    Refinement,
    /// Chat with the agents from the terminal.
    Chat {
        /// Gateway config file (TOML).
        #[arg(long, conflicts_with_all = ["base_url", "offline"])]
        config: Option<PathBuf>,
        /// Backend base URL, using the default endpoint paths.
        #[arg(long, conflicts_with = "offline")]
        base_url: Option<String>,
        /// Answer from the in-memory dashboard data instead of a backend.
        #[arg(long)]
        offline: bool,
        /// Agent to start with.
        #[arg(long)]
        agent: Option<String>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::SolutionDiscovery => solution_discovery::run_scenario(),
        Command::DocumentSync => document_sync::run_scenario(),
        Command::Refinement => refinement::run_scenario(),
        Command::Chat {
            config,
            base_url,
            offline,
            agent,
        } => build_gateway(config, base_url, offline)
            .and_then(|gateway| run_chat(gateway, agent.as_deref())),
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> MygoResult<()> {
    solution_discovery::run_scenario()?;
    document_sync::run_scenario()?;
    refinement::run_scenario()?;
    Ok(())
}

// ── Interactive chat ──────────────────────────────────────────────────────────

/// Prints surface requests instead of navigating.
struct PrintingRouter;

impl SurfaceRouter for PrintingRouter {
    fn request_surface(&self, surface: Surface) {
        match surface {
            Surface::FullEditor(agent_id) => println!("  (would open the full {} editor)", agent_id),
            Surface::Settings => println!("  (would open source settings)"),
            Surface::SpecCreation { solution } => {
                println!("  (would open spec creation with this solution)");
                for line in solution.lines() {
                    println!("    | {}", line);
                }
            }
        }
    }
}

fn build_gateway(
    config: Option<PathBuf>,
    base_url: Option<String>,
    offline: bool,
) -> MygoResult<Box<dyn BackendGateway>> {
    if offline {
        return Ok(Box::new(InMemoryGateway::with_default_fixture()?));
    }
    let config = match (config, base_url) {
        (Some(path), _) => GatewayConfig::from_file(&path)?,
        (None, Some(url)) => GatewayConfig::new(url),
        (None, None) => {
            return Err(MygoError::ConfigError {
                reason: "chat needs --config, --base-url or --offline".to_string(),
            })
        }
    };
    info!(base_url = %config.base_url, "using HTTP gateway");
    Ok(Box::new(HttpGateway::new(config)?))
}

fn print_help() {
    println!("  Type a message, or one of:");
    println!("    /agent <id>    switch agent (resets the conversation)");
    println!("    /agents        list agents");
    println!("    /action <id>   invoke an action by id");
    println!("    /quit          leave");
}

fn print_welcome(orchestrator: &Orchestrator, session: &ConversationSession) {
    let descriptor = orchestrator.descriptor(session);
    println!("  -- {} ({}) --", descriptor.name, descriptor.id);
    println!("  {}", descriptor.description);
    for action in orchestrator.welcome_actions(session) {
        println!("    > {} ({})", action.label, action.id);
    }
}

/// The label shown for `id` on the latest message that offers it.
fn offered_label(session: &ConversationSession, id: &str) -> Option<String> {
    session
        .messages()
        .iter()
        .rev()
        .flat_map(|m| m.actions.iter())
        .find(|a| a.id == id)
        .map(|a| a.label.clone())
}

fn run_chat(gateway: Box<dyn BackendGateway>, agent: Option<&str>) -> MygoResult<()> {
    let orchestrator = Orchestrator::new(AgentRegistry::builtin(), gateway, Box::new(PrintingRouter));
    let mut session = orchestrator.open_session(agent);
    let mut seen = 0;

    print_help();
    print_welcome(&orchestrator, &session);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", session.agent_id());
        io::stdout().flush().map_err(io_error)?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(io_error)?;
        let input = line.trim();

        if input == "/quit" {
            break;
        } else if input == "/agents" {
            for descriptor in orchestrator.registry().all() {
                println!("    {:<20} {}", descriptor.id.as_str(), descriptor.name);
            }
            continue;
        } else if let Some(id) = input.strip_prefix("/agent ") {
            if orchestrator.switch_agent(&mut session, Some(id.trim())) {
                seen = 0;
            }
            print_welcome(&orchestrator, &session);
            continue;
        } else if let Some(id) = input.strip_prefix("/action ") {
            let id = id.trim();
            let label = offered_label(&session, id)
                .or_else(|| {
                    orchestrator
                        .welcome_actions(&session)
                        .iter()
                        .find(|a| a.id == id)
                        .map(|a| a.label.clone())
                })
                .unwrap_or_else(|| id.to_string());
            let action = Action::from_wire(id, label, Emphasis::Outline);
            print_outcome(&orchestrator.invoke_action(&mut session, &action));
        } else {
            let outcome = orchestrator.submit_text(&mut session, input);
            if outcome.is_rejected() {
                print_outcome(&outcome);
            }
        }

        // A reset (spec handoff) shrinks the log.
        if session.messages().len() < seen {
            seen = 0;
        }
        print_new(&session, &mut seen);
        if !session.input_draft().is_empty() {
            println!("  (draft) {}", session.input_draft());
        }
    }
    Ok(())
}

fn io_error(e: io::Error) -> MygoError {
    MygoError::Transport {
        operation: "terminal".to_string(),
        reason: e.to_string(),
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("MYGO: Conversational Agent Dashboard");
    println!("Orchestration Core Demo");
    println!("=====================================");
    println!();
    println!("Each user turn is routed through:");
    println!("  [1] Agent registry resolves the active agent (unknown ids → ask-yoda)");
    println!("  [2] Freeform text → request shape, or the staged solution workflow");
    println!("  [3] Actions → dispatcher: backend call, local change, or surface request");
    println!("  [4] Backend reply → one assistant message; failures → one error message");
    println!("  [5] Replies for an abandoned conversation are discarded");
    println!();
}
