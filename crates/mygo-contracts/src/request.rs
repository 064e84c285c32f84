//! Typed backend operations and per-agent request shapes.
//!
//! Every freeform agent sends a slightly different field set. Rather than a
//! loosely-typed payload, each agent's descriptor carries a `RequestShape`
//! that knows how to turn one line of user text into a concrete
//! `AgentRequest`, and each `AgentRequest` variant knows its own operation
//! and JSON body.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Every backend operation the orchestration layer can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    AskYoda,
    GenerateSpec,
    GeneratePrompt,
    GenerateTestCases,
    ExplainCode,
    AnalyzeCode,
    SubmitRequirements,
    GenerateSolution,
    RefineSolution,
    SearchSimilar,
    Improvise,
    ListSources,
    ListProjects,
    ListDocuments,
    SyncSource,
}

impl Operation {
    /// Stable name used in logs, errors and gateway configuration keys.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AskYoda => "ask-yoda",
            Operation::GenerateSpec => "generate-spec",
            Operation::GeneratePrompt => "generate-prompt",
            Operation::GenerateTestCases => "generate-test-cases",
            Operation::ExplainCode => "explain-code",
            Operation::AnalyzeCode => "analyze-code",
            Operation::SubmitRequirements => "submit-requirements",
            Operation::GenerateSolution => "generate-solution",
            Operation::RefineSolution => "refine-solution",
            Operation::SearchSimilar => "search-similar",
            Operation::Improvise => "improvise",
            Operation::ListSources => "list-sources",
            Operation::ListProjects => "list-projects",
            Operation::ListDocuments => "list-documents",
            Operation::SyncSource => "sync-source",
        }
    }

    /// The response field holding the primary text for freeform operations.
    ///
    /// Returns `None` for operations whose responses are decoded into typed
    /// structures instead of being rendered as text.
    pub fn reply_field(&self) -> Option<&'static str> {
        match self {
            Operation::AskYoda => Some("answer"),
            Operation::GenerateSpec => Some("spec"),
            Operation::GeneratePrompt => Some("prompt"),
            Operation::GenerateTestCases => Some("test_cases"),
            Operation::ExplainCode => Some("explanation"),
            Operation::AnalyzeCode => Some("analysis"),
            _ => None,
        }
    }
}

/// Specification flavour accepted by the spec generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecType {
    Functional,
    Technical,
}

impl SpecType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecType::Functional => "functional",
            SpecType::Technical => "technical",
        }
    }
}

/// Test case flavour accepted by the test case generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Manual,
    Unit,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Manual => "manual",
            TestType::Unit => "unit",
        }
    }
}

/// Representation requested from a generation operation.
///
/// `Preview` returns JSON text; every other variant returns a binary document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Preview,
    Docx,
    Pdf,
    Excel,
}

impl OutputFormat {
    /// File extension used when saving a downloaded document.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Preview => "txt",
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Excel => "xlsx",
        }
    }

    /// MIME type of the saved document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Preview => "text/plain",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// A fully-formed request for one freeform or generation operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentRequest {
    Ask {
        query: String,
    },
    GenerateSpec {
        spec_type: SpecType,
        requirements: String,
        format: OutputFormat,
    },
    GeneratePrompt {
        language: String,
        task: String,
        context: String,
    },
    GenerateTestCases {
        code: String,
        test_type: TestType,
        format: OutputFormat,
    },
    ExplainCode {
        code: String,
        code_type: String,
        program_name: String,
    },
    AnalyzeCode {
        code: String,
        code_type: String,
    },
}

impl AgentRequest {
    pub fn operation(&self) -> Operation {
        match self {
            AgentRequest::Ask { .. } => Operation::AskYoda,
            AgentRequest::GenerateSpec { .. } => Operation::GenerateSpec,
            AgentRequest::GeneratePrompt { .. } => Operation::GeneratePrompt,
            AgentRequest::GenerateTestCases { .. } => Operation::GenerateTestCases,
            AgentRequest::ExplainCode { .. } => Operation::ExplainCode,
            AgentRequest::AnalyzeCode { .. } => Operation::AnalyzeCode,
        }
    }

    /// The JSON body the backend expects for this request.
    pub fn body(&self) -> Value {
        match self {
            AgentRequest::Ask { query } => json!({ "query": query }),
            AgentRequest::GenerateSpec {
                spec_type,
                requirements,
                format,
            } => json!({
                "type": spec_type.as_str(),
                "requirements": requirements,
                "format": spec_wire_format(*format),
            }),
            AgentRequest::GeneratePrompt {
                language,
                task,
                context,
            } => json!({ "language": language, "task": task, "context": context }),
            AgentRequest::GenerateTestCases {
                code,
                test_type,
                format,
            } => json!({
                "code": code,
                "test_type": test_type.as_str(),
                "format": test_case_wire_format(*format),
            }),
            AgentRequest::ExplainCode {
                code,
                code_type,
                program_name,
            } => json!({ "code": code, "code_type": code_type, "program_name": program_name }),
            AgentRequest::AnalyzeCode { code, code_type } => {
                json!({ "code": code, "code_type": code_type })
            }
        }
    }
}

fn spec_wire_format(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Preview => "preview",
        OutputFormat::Docx => "docx",
        OutputFormat::Pdf => "pdf",
        OutputFormat::Excel => "excel",
    }
}

// The test case endpoint names Word output "word".
fn test_case_wire_format(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Docx => "word",
        other => spec_wire_format(other),
    }
}

/// How a freeform agent turns one line of user text into a request.
///
/// Keyed by agent in the registry; `SolutionDiscovery` marks the staged agent,
/// which never issues a single freeform request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestShape {
    Ask,
    Spec { spec_type: SpecType },
    Prompt { language: String },
    TestCases { test_type: TestType },
    ExplainCode { code_type: String },
    AnalyzeCode { code_type: String },
    SolutionDiscovery,
}

impl RequestShape {
    /// Build the request for one freeform turn, or `None` for the staged agent.
    pub fn build(&self, text: &str) -> Option<AgentRequest> {
        let text = text.to_string();
        let request = match self {
            RequestShape::Ask => AgentRequest::Ask { query: text },
            RequestShape::Spec { spec_type } => AgentRequest::GenerateSpec {
                spec_type: *spec_type,
                requirements: text,
                format: OutputFormat::Preview,
            },
            RequestShape::Prompt { language } => AgentRequest::GeneratePrompt {
                language: language.clone(),
                task: text,
                context: String::new(),
            },
            RequestShape::TestCases { test_type } => AgentRequest::GenerateTestCases {
                code: text,
                test_type: *test_type,
                format: OutputFormat::Preview,
            },
            RequestShape::ExplainCode { code_type } => AgentRequest::ExplainCode {
                code: text,
                code_type: code_type.clone(),
                program_name: String::new(),
            },
            RequestShape::AnalyzeCode { code_type } => AgentRequest::AnalyzeCode {
                code: text,
                code_type: code_type.clone(),
            },
            RequestShape::SolutionDiscovery => return None,
        };
        Some(request)
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, RequestShape::SolutionDiscovery)
    }
}

/// The original inputs of one generation-style artifact.
///
/// Refinements never mutate these; they derive a one-off request whose
/// primary text field embeds the previous artifact and the new request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationInputs {
    Spec {
        spec_type: SpecType,
        requirements: String,
    },
    Prompt {
        language: String,
        task: String,
        context: String,
    },
    TestCases {
        code: String,
        test_type: TestType,
    },
}

impl GenerationInputs {
    /// Human-readable artifact name used in section headers and acknowledgements.
    pub fn artifact_label(&self) -> &'static str {
        match self {
            GenerationInputs::Spec { .. } => "Specification",
            GenerationInputs::Prompt { .. } => "Prompt",
            GenerationInputs::TestCases { .. } => "Test Cases",
        }
    }

    /// The text field refinements are folded into.
    pub fn primary_text(&self) -> &str {
        match self {
            GenerationInputs::Spec { requirements, .. } => requirements,
            GenerationInputs::Prompt { task, .. } => task,
            GenerationInputs::TestCases { code, .. } => code,
        }
    }

    /// Build the generation request in the given format.
    pub fn to_request(&self, format: OutputFormat) -> AgentRequest {
        match self {
            GenerationInputs::Spec {
                spec_type,
                requirements,
            } => AgentRequest::GenerateSpec {
                spec_type: *spec_type,
                requirements: requirements.clone(),
                format,
            },
            // The prompt generator has no document output; format is ignored.
            GenerationInputs::Prompt {
                language,
                task,
                context,
            } => AgentRequest::GeneratePrompt {
                language: language.clone(),
                task: task.clone(),
                context: context.clone(),
            },
            GenerationInputs::TestCases { code, test_type } => AgentRequest::GenerateTestCases {
                code: code.clone(),
                test_type: *test_type,
                format,
            },
        }
    }

    /// Build the self-contained refinement request.
    ///
    /// Section order is fixed: original inputs, current artifact, request.
    pub fn refinement_request(&self, artifact: &str, request: &str) -> AgentRequest {
        let folded = format!(
            "{}\n\n[Previous {}]:\n{}\n\n[Refinement Request]:\n{}",
            self.primary_text(),
            self.artifact_label(),
            artifact,
            request
        );
        let mut inputs = self.clone();
        match &mut inputs {
            GenerationInputs::Spec { requirements, .. } => *requirements = folded,
            GenerationInputs::Prompt { task, .. } => *task = folded,
            GenerationInputs::TestCases { code, .. } => *code = folded,
        }
        inputs.to_request(OutputFormat::Preview)
    }

    /// File name for a downloaded document in `format`.
    pub fn file_name(&self, format: OutputFormat) -> String {
        match self {
            GenerationInputs::Spec { spec_type, .. } => {
                format!("{}_specification.{}", spec_type.as_str(), format.extension())
            }
            GenerationInputs::Prompt { .. } => format!("prompt.{}", format.extension()),
            GenerationInputs::TestCases { .. } => format!("test_cases.{}", format.extension()),
        }
    }

    pub fn supports_download(&self) -> bool {
        !matches!(self, GenerationInputs::Prompt { .. })
    }
}
