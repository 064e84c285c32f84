//! Simulated backend content for the MYGO reference dashboard.
//!
//! Everything here is hardcoded and fictional. No model is called: each
//! function derives a plausible response from its input so walkthroughs can
//! show how replies flow through the orchestration core.

use mygo_contracts::request::{SpecType, TestType};

/// Requirements shorter than this many words get a clarification round.
pub const MIN_REQUIREMENT_WORDS: usize = 8;

// ── Knowledge assistant ──────────────────────────────────────────────────────

pub fn answer(query: &str) -> String {
    let q = query.to_lowercase();
    if q.contains("clean core") {
        "Clean core means keeping the ERP standard untouched: extensions live \
         side-by-side or use released APIs, so upgrades stay predictable."
            .to_string()
    } else if q.contains("migration") || q.contains("s/4") {
        "A typical S/4HANA migration runs through discover, prepare, explore, \
         realize, deploy and run, with data migration rehearsed in every \
         realize sprint."
            .to_string()
    } else if q.contains("sync") {
        "Use the Sync Documents agent: \"Sync all sources\" pulls every configured \
         source, \"Sync from Cloud ALM\" lets you pick one project."
            .to_string()
    } else {
        format!(
            "Here is what the knowledge base says about \"{}\": no curated answer \
             exists yet, so start from the standard process documentation.",
            query.trim()
        )
    }
}

// ── Solution advisor ─────────────────────────────────────────────────────────

pub fn needs_clarification(requirements: &str) -> bool {
    requirements.split_whitespace().count() < MIN_REQUIREMENT_WORDS
}

pub fn clarification_questions() -> String {
    "Before I propose a solution, could you clarify:\n\
     1. Which plants or company codes are in scope?\n\
     2. Should refunds be issued before or after inspection?"
        .to_string()
}

pub fn requirements_accepted(requirements: &str) -> String {
    format!(
        "Thanks, I have {} words of requirements. That is enough to draft a proposal.",
        requirements.split_whitespace().count()
    )
}

pub fn solution_for(requirements: &str) -> String {
    let headline = requirements.lines().next().unwrap_or("the request").trim();
    format!(
        "Solution outline for: {}\n\
         - Model the process with a dedicated sales document type\n\
         - Trigger follow-up activities from goods receipt\n\
         - Report status through a standard Fiori monitor",
        headline
    )
}

pub fn refine_solution(current: &str, feedback: &str) -> String {
    format!("{}\n- Adjusted per feedback: {}", current, feedback.trim())
}

pub fn improvise(current: &str, prior_art: &[String], instruction: &str) -> String {
    let mut solution = current.to_string();
    if let Some(first) = prior_art.first() {
        solution.push_str(&format!("\n- Reuses prior art: {}", first));
    }
    solution.push_str(&format!("\n- Final adjustment: {}", instruction.trim()));
    solution
}

// ── Generation agents ────────────────────────────────────────────────────────

const REFINEMENT_MARKER: &str = "[Refinement Request]:\n";

/// Split a folded refinement text into (previous artifact, request).
fn refinement_parts(text: &str) -> Option<(&str, &str)> {
    let (head, request) = text.split_once(REFINEMENT_MARKER)?;
    let previous = head.split_once("]:\n").map(|(_, p)| p.trim_end())?;
    Some((previous, request.trim()))
}

fn revise(text: &str, fresh: impl FnOnce(&str) -> String) -> String {
    match refinement_parts(text) {
        Some((previous, request)) => format!("{}\n\nRevision: {}", previous, request),
        None => fresh(text),
    }
}

pub fn specification(spec_type: SpecType, requirements: &str) -> String {
    revise(requirements, |r| {
        format!(
            "# {} Specification\n\n## Scope\n{}\n\n## Process Steps\n1. Capture\n2. Validate\n3. Post",
            match spec_type {
                SpecType::Functional => "Functional",
                SpecType::Technical => "Technical",
            },
            r.trim()
        )
    })
}

pub fn prompt(language: &str, task: &str) -> String {
    revise(task, |t| {
        format!(
            "You are a senior {} developer. Task: {}. Follow clean core rules.",
            language,
            t.trim()
        )
    })
}

pub fn test_cases(test_type: TestType, code: &str) -> String {
    revise(code, |c| {
        let lines = c.lines().count().max(1);
        format!(
            "{} test cases ({} line(s) under test)\nTC-1 happy path\nTC-2 empty input\nTC-3 authorization failure",
            match test_type {
                TestType::Manual => "Manual",
                TestType::Unit => "Unit",
            },
            lines
        )
    })
}

pub fn explanation(code_type: &str, code: &str) -> String {
    format!(
        "This {} snippet has {} statement(s). It reads data, loops over the result \
         and writes a list output.",
        code_type,
        code.matches('.').count().max(1)
    )
}

pub fn analysis(code: &str) -> String {
    let mut findings = Vec::new();
    if code.to_uppercase().contains("SELECT *") {
        findings.push("Avoid SELECT *; list the fields you need.");
    }
    if findings.is_empty() {
        findings.push("No issues found.");
    }
    format!("Code review:\n- {}", findings.join("\n- "))
}

/// A stand-in binary document: a tag for the format followed by the text.
pub fn document_bytes(format_tag: &str, text: &str) -> Vec<u8> {
    let mut bytes = format!("%MYGO-{}%\n", format_tag).into_bytes();
    bytes.extend_from_slice(text.as_bytes());
    bytes
}
