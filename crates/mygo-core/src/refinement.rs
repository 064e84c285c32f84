//! The refinement loop used by the generation agents.
//!
//! `generate` produces an artifact from a set of inputs; each `refine` sends
//! a self-contained request made of the original inputs, the current
//! artifact and the new request, and replaces the artifact wholesale. A
//! download re-issues the original generation in a document format instead
//! of converting the preview text.
//!
//! Operations take `&mut self`, so no two of them can overlap on one loop.

use tracing::{debug, info, warn};

use mygo_contracts::{
    error::MygoError,
    outcome::{DownloadOutcome, DownloadedArtifact, LoopOutcome, RejectReason},
    request::{GenerationInputs, OutputFormat},
};

use crate::{reply::artifact_text, traits::BackendGateway};

/// One refinement request and the reply shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinementTurn {
    pub request: String,
    pub acknowledgement: String,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefinementContext {
    inputs: GenerationInputs,
    artifact: String,
    history: Vec<RefinementTurn>,
}

impl RefinementContext {
    pub fn inputs(&self) -> &GenerationInputs {
        &self.inputs
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn history(&self) -> &[RefinementTurn] {
        &self.history
    }
}

#[derive(Debug, Clone, Default)]
pub struct RefinementLoop {
    context: Option<RefinementContext>,
}

impl RefinementLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&RefinementContext> {
        self.context.as_ref()
    }

    pub fn artifact(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.artifact.as_str())
    }

    /// Generate a fresh artifact, starting a new context on success.
    ///
    /// On failure any previous context is kept untouched.
    pub fn generate(
        &mut self,
        gateway: &dyn BackendGateway,
        inputs: GenerationInputs,
    ) -> LoopOutcome {
        if inputs.primary_text().trim().is_empty() {
            return LoopOutcome::Rejected {
                reason: RejectReason::EmptyInput,
            };
        }

        let request = inputs.to_request(OutputFormat::Preview);
        let operation = request.operation();
        debug!(operation = operation.name(), "generating artifact");

        let body = match gateway.invoke(&request) {
            Ok(body) => body,
            Err(e) => return failed(&format!("Error generating {}", label(&inputs)), e),
        };
        match artifact_text(&body, operation) {
            Ok(artifact) => {
                info!(operation = operation.name(), "artifact generated");
                self.context = Some(RefinementContext {
                    inputs,
                    artifact,
                    history: Vec::new(),
                });
                LoopOutcome::Produced
            }
            Err(message) => {
                warn!(operation = operation.name(), reason = %message, "generation returned no artifact");
                LoopOutcome::Failed { message }
            }
        }
    }

    /// Refine the current artifact. The request always carries the artifact
    /// as it is now, never an earlier draft.
    pub fn refine(&mut self, gateway: &dyn BackendGateway, request: &str) -> LoopOutcome {
        if request.trim().is_empty() {
            return LoopOutcome::Rejected {
                reason: RejectReason::EmptyInput,
            };
        }
        let Some(context) = self.context.as_mut() else {
            return LoopOutcome::Rejected {
                reason: RejectReason::NoArtifact,
            };
        };

        let outbound = context.inputs.refinement_request(&context.artifact, request);
        let operation = outbound.operation();
        let result = gateway
            .invoke(&outbound)
            .map_err(|e| e.to_string())
            .and_then(|body| artifact_text(&body, operation));

        match result {
            Ok(artifact) => {
                context.artifact = artifact;
                context.history.push(RefinementTurn {
                    request: request.to_string(),
                    acknowledgement: format!(
                        "I've updated the {} based on your feedback.",
                        label(&context.inputs)
                    ),
                    failed: false,
                });
                debug!(operation = operation.name(), turns = context.history.len(), "artifact refined");
                LoopOutcome::Produced
            }
            Err(message) => {
                warn!(operation = operation.name(), reason = %message, "refinement failed");
                context.history.push(RefinementTurn {
                    request: request.to_string(),
                    acknowledgement: format!(
                        "Error refining {}. Please try again.",
                        label(&context.inputs)
                    ),
                    failed: true,
                });
                LoopOutcome::Failed { message }
            }
        }
    }

    /// Fetch the artifact as a document by re-running the original generation.
    pub fn download(&self, gateway: &dyn BackendGateway, format: OutputFormat) -> DownloadOutcome {
        let Some(context) = self.context.as_ref() else {
            return DownloadOutcome::Rejected {
                reason: RejectReason::NoArtifact,
            };
        };
        if format == OutputFormat::Preview || !context.inputs.supports_download() {
            return DownloadOutcome::Rejected {
                reason: RejectReason::DownloadUnsupported,
            };
        }

        let request = context.inputs.to_request(format);
        let payload = match gateway.download(&request) {
            Ok(payload) => payload,
            Err(MygoError::NotBinary { message, .. }) => {
                return DownloadOutcome::Failed {
                    message: format!("Error downloading: {}", message),
                }
            }
            Err(e) => {
                warn!(operation = request.operation().name(), error = %e, "download failed");
                return DownloadOutcome::Failed {
                    message: format!("Error downloading: {}", e),
                };
            }
        };

        if payload.is_json() {
            let reason = serde_json::from_slice::<serde_json::Value>(&payload.bytes)
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!(operation = request.operation().name(), reason = %reason, "download returned JSON");
            return DownloadOutcome::Failed {
                message: format!("Error downloading: {}", reason),
            };
        }

        DownloadOutcome::Ready(DownloadedArtifact {
            file_name: context.inputs.file_name(format),
            mime_type: format.mime_type().to_string(),
            format,
            bytes: payload.bytes,
        })
    }

    /// Discard the artifact and its history.
    pub fn restart(&mut self) {
        self.context = None;
    }
}

fn label(inputs: &GenerationInputs) -> String {
    inputs.artifact_label().to_lowercase()
}

fn failed(what: &str, error: MygoError) -> LoopOutcome {
    warn!(error = %error, "{}", what);
    LoopOutcome::Failed {
        message: format!("{}: {}", what, error),
    }
}
