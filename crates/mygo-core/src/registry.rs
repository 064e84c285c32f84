//! The agent registry: a static catalog of agent descriptors.
//!
//! Lookup never fails. Unknown or absent ids resolve to the general-purpose
//! knowledge assistant so a chat surface can always be rendered.

use mygo_contracts::{
    action::{Action, ActionKind, Emphasis},
    agent::{AgentDescriptor, AgentId},
    request::{RequestShape, SpecType, TestType},
};

/// Id of the fallback agent.
pub const DEFAULT_AGENT_ID: &str = "ask-yoda";

/// Id of the one agent driven by the staged workflow.
pub const SOLUTION_ADVISOR_ID: &str = "solution-advisor";

#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
    default_index: usize,
}

impl AgentRegistry {
    /// Build a registry from `agents`, in display order.
    ///
    /// If no descriptor has the default id, the built-in knowledge assistant
    /// is prepended so `resolve` always has a fallback.
    pub fn new(mut agents: Vec<AgentDescriptor>) -> Self {
        let default_index = match agents.iter().position(|a| a.id.as_str() == DEFAULT_AGENT_ID) {
            Some(index) => index,
            None => {
                agents.insert(0, ask_yoda());
                0
            }
        };
        Self {
            agents,
            default_index,
        }
    }

    /// The dashboard's built-in catalog.
    pub fn builtin() -> Self {
        Self::new(vec![
            ask_yoda(),
            solution_advisor(),
            freeform(
                "spec-assistant",
                "Spec Agent",
                "Auto-generate Specifications",
                RequestShape::Spec {
                    spec_type: SpecType::Functional,
                },
                true,
            ),
            freeform(
                "prompt-generator",
                "Prompt Generator",
                "Generate Workflow Prompts",
                RequestShape::Prompt {
                    language: "ABAP".to_string(),
                },
                true,
            ),
            freeform(
                "test-case-generator",
                "Test Case Generator",
                "Generate Test Cases",
                RequestShape::TestCases {
                    test_type: TestType::Manual,
                },
                true,
            ),
            freeform(
                "explain-code",
                "Explain Code",
                "Intelligent Code Explanations",
                RequestShape::ExplainCode {
                    code_type: "ABAP".to_string(),
                },
                true,
            ),
            freeform(
                "code-advisor",
                "Code Advisor",
                "Code Quality Analysis",
                RequestShape::AnalyzeCode {
                    code_type: "ABAP".to_string(),
                },
                true,
            ),
            sync_documents(),
        ])
    }

    /// Resolve `agent_id` to a descriptor, falling back to the default agent.
    pub fn resolve(&self, agent_id: Option<&str>) -> &AgentDescriptor {
        agent_id
            .and_then(|id| self.get(id))
            .unwrap_or(&self.agents[self.default_index])
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.id.as_str() == agent_id)
    }

    pub fn default_agent(&self) -> &AgentDescriptor {
        &self.agents[self.default_index]
    }

    pub fn all(&self) -> &[AgentDescriptor] {
        &self.agents
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// ── Built-in descriptors ─────────────────────────────────────────────────────

fn freeform(
    id: &str,
    name: &str,
    description: &str,
    shape: RequestShape,
    full_editor: bool,
) -> AgentDescriptor {
    AgentDescriptor {
        id: AgentId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        shape,
        welcome_actions: Vec::new(),
        placeholder: format!("Ask {}...", name),
        full_editor,
    }
}

fn ask_yoda() -> AgentDescriptor {
    AgentDescriptor {
        welcome_actions: vec![
            Action::suggestion(
                "s4-migration",
                "What are the key phases of an S/4HANA migration?",
            ),
            Action::suggestion("clean-core", "Explain the clean core principle"),
            Action::suggestion(
                "fiori-apps",
                "How do I find the right Fiori app for a business process?",
            ),
        ],
        ..freeform(
            DEFAULT_AGENT_ID,
            "Ask Yoda",
            "AI-Powered Knowledge Assistant",
            RequestShape::Ask,
            false,
        )
    }
}

fn solution_advisor() -> AgentDescriptor {
    AgentDescriptor {
        placeholder: "Describe your requirements or answer the questions...".to_string(),
        ..freeform(
            SOLUTION_ADVISOR_ID,
            "Solution Advisor",
            "AI-Powered Solution Recommendations",
            RequestShape::SolutionDiscovery,
            true,
        )
    }
}

// Free text typed into the sync agent goes to the knowledge assistant.
fn sync_documents() -> AgentDescriptor {
    AgentDescriptor {
        welcome_actions: vec![
            Action::new(ActionKind::SyncAll, "Sync all sources", Emphasis::Primary),
            Action::new(
                ActionKind::SyncConnected,
                "Sync from Cloud ALM",
                Emphasis::Secondary,
            ),
            Action::new(ActionKind::ListSources, "List sources", Emphasis::Outline),
        ],
        ..freeform(
            "sync-documents",
            "Sync Documents",
            "Sync from All Sources",
            RequestShape::Ask,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_absent_ids_resolve_to_the_default_agent() {
        let registry = AgentRegistry::builtin();
        assert_eq!(registry.resolve(None).id.as_str(), DEFAULT_AGENT_ID);
        assert_eq!(registry.resolve(Some("no-such-agent")).id.as_str(), DEFAULT_AGENT_ID);
        assert_eq!(registry.resolve(Some("")).id.as_str(), DEFAULT_AGENT_ID);
    }

    #[test]
    fn known_ids_resolve_to_their_descriptor() {
        let registry = AgentRegistry::builtin();
        let advisor = registry.resolve(Some(SOLUTION_ADVISOR_ID));
        assert_eq!(advisor.name, "Solution Advisor");
        assert!(advisor.is_staged());

        let spec = registry.resolve(Some("spec-assistant"));
        assert!(!spec.is_staged());
        assert!(spec.full_editor);
        assert_eq!(spec.placeholder, "Ask Spec Agent...");
    }

    #[test]
    fn only_the_solution_advisor_is_staged() {
        let registry = AgentRegistry::builtin();
        let staged: Vec<&str> = registry
            .all()
            .iter()
            .filter(|a| a.is_staged())
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(staged, vec![SOLUTION_ADVISOR_ID]);
    }

    #[test]
    fn custom_catalog_without_default_gets_one() {
        let registry = AgentRegistry::new(vec![freeform(
            "explain-code",
            "Explain Code",
            "Explain",
            RequestShape::ExplainCode {
                code_type: "ABAP".to_string(),
            },
            false,
        )]);
        assert_eq!(registry.all().len(), 2);
        assert_eq!(registry.resolve(Some("missing")).id.as_str(), DEFAULT_AGENT_ID);
        assert_eq!(registry.resolve(Some("explain-code")).name, "Explain Code");
    }

    #[test]
    fn sync_agent_offers_sync_actions_before_any_input() {
        let registry = AgentRegistry::builtin();
        let sync = registry.resolve(Some("sync-documents"));
        let kinds: Vec<&ActionKind> = sync.welcome_actions.iter().map(|a| &a.kind).collect();
        assert!(kinds.contains(&&ActionKind::SyncAll));
        assert!(kinds.contains(&&ActionKind::SyncConnected));
        assert!(kinds.contains(&&ActionKind::ListSources));
    }
}
