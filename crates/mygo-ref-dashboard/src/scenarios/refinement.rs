//! Scenario 3: Artifact Refinement
//!
//! Generates a functional specification, refines it twice and downloads it:
//!
//!   1. Generate the preview from the original requirements
//!   2. Each refinement carries the current artifact, never an earlier draft
//!   3. A Word download re-runs the original generation
//!   4. A JSON body in place of the document is reported as a failure
//!   5. The prompt generator has no document output at all

use mygo_contracts::{
    error::MygoResult,
    outcome::{DownloadOutcome, LoopOutcome},
    request::{GenerationInputs, OutputFormat, SpecType},
};
use mygo_core::refinement::RefinementLoop;

use super::Dashboard;

pub const REQUIREMENTS: &str =
    "Returns with quality inspection in plants 1000 and 2000, refund after inspection";
pub const REFINEMENTS: [&str; 2] = [
    "Add a section on credit blocks",
    "List the Fiori apps used by the inspectors",
];

pub fn spec_inputs() -> GenerationInputs {
    GenerationInputs::Spec {
        spec_type: SpecType::Functional,
        requirements: REQUIREMENTS.to_string(),
    }
}

fn print_artifact(refinement: &RefinementLoop) {
    for line in refinement.artifact().unwrap_or_default().lines() {
        println!("    | {}", line);
    }
}

fn print_download(outcome: &DownloadOutcome) {
    match outcome {
        DownloadOutcome::Ready(artifact) => println!(
            "  Download ready: {} ({}, {} bytes)",
            artifact.file_name,
            artifact.mime_type,
            artifact.bytes.len()
        ),
        DownloadOutcome::Failed { message } => println!("  Download failed: {}", message),
        DownloadOutcome::Rejected { reason } => println!("  Download rejected: {:?}", reason),
    }
}

/// Run Scenario 3: Artifact Refinement.
pub fn run_scenario() -> MygoResult<()> {
    println!("=== Scenario 3: Artifact Refinement ===");
    println!();

    let dash = Dashboard::with_default_fixture()?;
    let gateway = dash.orchestrator.gateway();
    let mut refinement = RefinementLoop::new();

    let outcome = refinement.generate(gateway, spec_inputs());
    println!("  Generate: {:?}", outcome);
    print_artifact(&refinement);

    for request in REFINEMENTS {
        let outcome = refinement.refine(gateway, request);
        println!("  Refine \"{}\": {:?}", request, outcome);
        if let Some(turn) = refinement.context().and_then(|c| c.history().last()) {
            println!("  [assistant] {}", turn.acknowledgement);
        }
    }
    print_artifact(&refinement);

    print_download(&refinement.download(gateway, OutputFormat::Docx));

    dash.gateway.set_json_download_errors(true);
    print_download(&refinement.download(gateway, OutputFormat::Pdf));
    dash.gateway.set_json_download_errors(false);

    let mut prompt = RefinementLoop::new();
    prompt.generate(
        gateway,
        GenerationInputs::Prompt {
            language: "ABAP".to_string(),
            task: "Read open return orders".to_string(),
            context: String::new(),
        },
    );
    print_download(&prompt.download(gateway, OutputFormat::Docx));

    println!();
    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mygo_contracts::{outcome::RejectReason, request::AgentRequest};

    #[test]
    fn test_scenario_runs() {
        assert!(run_scenario().is_ok());
    }

    #[test]
    fn test_refinements_build_on_the_current_artifact() {
        let dash = Dashboard::with_default_fixture().unwrap();
        let gateway = dash.orchestrator.gateway();
        let mut refinement = RefinementLoop::new();

        assert_eq!(refinement.generate(gateway, spec_inputs()), LoopOutcome::Produced);
        let first = refinement.artifact().unwrap().to_string();
        for request in REFINEMENTS {
            assert_eq!(refinement.refine(gateway, request), LoopOutcome::Produced);
        }

        let artifact = refinement.artifact().unwrap();
        assert!(artifact.starts_with(&first));
        assert!(artifact.ends_with(&format!(
            "Revision: {}\n\nRevision: {}",
            REFINEMENTS[0], REFINEMENTS[1]
        )));

        // The second request embeds the artifact produced by the first.
        let requests = dash.gateway.requests();
        let AgentRequest::GenerateSpec { requirements, .. } = &requests[2] else {
            panic!("expected a spec request, got {:?}", requests[2]);
        };
        assert!(requirements.contains(&format!("Revision: {}", REFINEMENTS[0])));
        assert!(requirements.ends_with(REFINEMENTS[1]));

        let context = refinement.context().unwrap();
        assert_eq!(context.inputs(), &spec_inputs());
        assert_eq!(context.history().len(), 2);
        assert_eq!(
            context.history()[0].acknowledgement,
            "I've updated the specification based on your feedback."
        );
    }

    #[test]
    fn test_word_download_reissues_the_original_generation() {
        let dash = Dashboard::with_default_fixture().unwrap();
        let gateway = dash.orchestrator.gateway();
        let mut refinement = RefinementLoop::new();
        refinement.generate(gateway, spec_inputs());
        refinement.refine(gateway, REFINEMENTS[0]);

        let DownloadOutcome::Ready(artifact) = refinement.download(gateway, OutputFormat::Docx)
        else {
            panic!("expected a document");
        };

        assert_eq!(artifact.file_name, "functional_specification.docx");
        assert_eq!(artifact.mime_type, OutputFormat::Docx.mime_type());
        assert!(artifact.bytes.starts_with(b"%MYGO-docx%\n"));
        assert_eq!(
            dash.gateway.requests().last(),
            Some(&AgentRequest::GenerateSpec {
                spec_type: SpecType::Functional,
                requirements: REQUIREMENTS.to_string(),
                format: OutputFormat::Docx,
            })
        );
    }

    #[test]
    fn test_json_body_in_place_of_a_document_fails() {
        let dash = Dashboard::with_default_fixture().unwrap();
        let gateway = dash.orchestrator.gateway();
        let mut refinement = RefinementLoop::new();
        refinement.generate(gateway, spec_inputs());
        dash.gateway.set_json_download_errors(true);

        assert_eq!(
            refinement.download(gateway, OutputFormat::Pdf),
            DownloadOutcome::Failed {
                message: "Error downloading: document template not available".to_string()
            }
        );
        assert!(refinement.artifact().is_some());
    }

    #[test]
    fn test_prompt_has_no_document_output() {
        let dash = Dashboard::with_default_fixture().unwrap();
        let gateway = dash.orchestrator.gateway();
        let mut prompt = RefinementLoop::new();
        prompt.generate(
            gateway,
            GenerationInputs::Prompt {
                language: "ABAP".to_string(),
                task: "Read open return orders".to_string(),
                context: String::new(),
            },
        );

        assert_eq!(
            prompt.download(gateway, OutputFormat::Docx),
            DownloadOutcome::Rejected {
                reason: RejectReason::DownloadUnsupported
            }
        );
    }
}
