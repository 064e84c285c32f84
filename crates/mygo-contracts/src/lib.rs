//! # mygo-contracts
//!
//! Shared types and contracts for the MYGO conversational orchestration layer.
//!
//! Every crate in the workspace imports from here. No orchestration logic
//! lives in this crate: only data definitions, wire shapes and error types.

pub mod action;
pub mod agent;
pub mod error;
pub mod gateway;
pub mod message;
pub mod outcome;
pub mod request;
pub mod stage;

#[cfg(test)]
mod tests {
    use super::*;
    use action::{Action, ActionKind, Emphasis};
    use error::MygoError;
    use gateway::{BinaryPayload, SimilarSolution, SyncReport};
    use message::{MessageId, NewMessage, Role};
    use request::{GenerationInputs, OutputFormat, RequestShape, SpecType, TestType};
    use stage::Stage;

    // ── ActionKind parsing ───────────────────────────────────────────────────

    #[test]
    fn exact_ids_parse_to_their_kinds() {
        assert_eq!(ActionKind::from_id("open-editor"), ActionKind::OpenEditor);
        assert_eq!(ActionKind::from_id("sync-all"), ActionKind::SyncAll);
        assert_eq!(ActionKind::from_id("sync-calm"), ActionKind::SyncConnected);
        assert_eq!(ActionKind::from_id("list-sources"), ActionKind::ListSources);
        assert_eq!(ActionKind::from_id("search-similar"), ActionKind::SearchSimilar);
    }

    #[test]
    fn scoped_sync_ids_carry_their_targets() {
        assert_eq!(
            ActionKind::from_id("sync-source:src-1"),
            ActionKind::SyncSource { source_id: "src-1".to_string() }
        );
        assert_eq!(
            ActionKind::from_id("sync-project:src-1:proj:7"),
            ActionKind::SyncProject {
                source_id: "src-1".to_string(),
                project_id: "proj:7".to_string(),
            }
        );
        // Missing target falls through to Unknown rather than an empty id.
        assert_eq!(ActionKind::from_id("sync-source:"), ActionKind::Unknown);
        assert_eq!(ActionKind::from_id("sync-project:src-1"), ActionKind::Unknown);
    }

    #[test]
    fn suggestion_prefixes_and_unknown_ids() {
        assert_eq!(ActionKind::from_id("suggest-migration"), ActionKind::Suggestion);
        assert_eq!(ActionKind::from_id("ask-about-fiori"), ActionKind::Suggestion);
        assert_eq!(ActionKind::from_id("try-this"), ActionKind::Suggestion);
        assert_eq!(ActionKind::from_id("launch-rocket"), ActionKind::Unknown);
        assert_eq!(ActionKind::from_id(""), ActionKind::Unknown);
    }

    #[test]
    fn canonical_ids_parse_back_to_the_same_kind() {
        let kinds = vec![
            ActionKind::OpenEditor,
            ActionKind::OpenSettings,
            ActionKind::SyncSource { source_id: "a".to_string() },
            ActionKind::SyncProject {
                source_id: "a".to_string(),
                project_id: "b".to_string(),
            },
            ActionKind::ProceedToSpec,
            ActionKind::CreateSpec,
        ];
        for kind in kinds {
            let id = kind.canonical_id().unwrap();
            assert_eq!(ActionKind::from_id(&id), kind, "id {}", id);
        }
    }

    #[test]
    fn action_wire_format_omits_kind_and_rederives_it() {
        let action = Action::new(
            ActionKind::SyncSource { source_id: "src-9".to_string() },
            "Sync Cloud ALM",
            Emphasis::Secondary,
        );
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["id"], "sync-source:src-9");
        assert!(json.get("kind").is_none());

        let decoded: Action = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, action);
    }

    #[test]
    fn ids_containing_separators_survive_the_wire() {
        let action = Action::new(
            ActionKind::SyncProject {
                source_id: "tenant:eu".to_string(),
                project_id: "P1 %done".to_string(),
            },
            "Rollout",
            Emphasis::Outline,
        );
        assert_eq!(action.id, "sync-project:tenant%3Aeu:P1%20%25done");

        let json = serde_json::to_string(&action).unwrap();
        let decoded: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(
            decoded.kind,
            ActionKind::SyncProject {
                source_id: "tenant:eu".to_string(),
                project_id: "P1 %done".to_string(),
            }
        );

        let source = ActionKind::SyncSource { source_id: "a:b".to_string() };
        let id = source.canonical_id().unwrap();
        assert_eq!(ActionKind::from_id(&id), source);
    }

    // ── Request shapes ───────────────────────────────────────────────────────

    #[test]
    fn freeform_shapes_build_agent_specific_bodies() {
        let ask = RequestShape::Ask.build("What is RISE?").unwrap();
        assert_eq!(ask.body(), serde_json::json!({ "query": "What is RISE?" }));

        let spec = RequestShape::Spec { spec_type: SpecType::Functional }
            .build("Returns workflow")
            .unwrap();
        let body = spec.body();
        assert_eq!(body["type"], "functional");
        assert_eq!(body["requirements"], "Returns workflow");
        assert_eq!(body["format"], "preview");

        assert!(RequestShape::SolutionDiscovery.build("anything").is_none());
    }

    #[test]
    fn test_case_docx_downloads_use_the_word_wire_name() {
        let inputs = GenerationInputs::TestCases {
            code: "REPORT z.".to_string(),
            test_type: TestType::Unit,
        };
        let body = inputs.to_request(OutputFormat::Docx).body();
        assert_eq!(body["format"], "word");
        assert_eq!(body["test_type"], "unit");
        assert_eq!(inputs.file_name(OutputFormat::Excel), "test_cases.xlsx");
    }

    #[test]
    fn refinement_request_orders_original_artifact_then_request() {
        let inputs = GenerationInputs::Prompt {
            language: "ABAP".to_string(),
            task: "Read sales orders".to_string(),
            context: "S/4".to_string(),
        };
        let body = inputs.refinement_request("PROMPT V1", "add paging").body();
        let task = body["task"].as_str().unwrap();

        let original = task.find("Read sales orders").unwrap();
        let artifact = task.find("PROMPT V1").unwrap();
        let request = task.find("add paging").unwrap();
        assert!(original < artifact && artifact < request);
        assert!(task.contains("[Previous Prompt]:"));
        // Secondary inputs are resent untouched.
        assert_eq!(body["context"], "S/4");
        assert_eq!(body["language"], "ABAP");
    }

    // ── Gateway types ────────────────────────────────────────────────────────

    #[test]
    fn relevance_percent_rounds_and_clamps() {
        let item = |relevance| SimilarSolution {
            title: "t".to_string(),
            summary: "s".to_string(),
            relevance,
        };
        assert_eq!(item(0.82).relevance_percent(), 82);
        assert_eq!(item(0.826).relevance_percent(), 83);
        assert_eq!(item(1.4).relevance_percent(), 100);
        assert_eq!(item(-0.2).relevance_percent(), 0);
    }

    #[test]
    fn json_payload_detection_ignores_parameters() {
        let json = BinaryPayload {
            content_type: "application/json; charset=utf-8".to_string(),
            bytes: vec![],
        };
        let pdf = BinaryPayload {
            content_type: "application/pdf".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert!(json.is_json());
        assert!(!pdf.is_json());
    }

    #[test]
    fn sync_reports_merge_counts() {
        let mut total = SyncReport { synced: 2, skipped: 1, failed: 0 };
        total.merge(SyncReport { synced: 3, skipped: 0, failed: 1 });
        assert_eq!(total, SyncReport { synced: 5, skipped: 1, failed: 1 });
        assert_eq!(total.total(), 7);
    }

    // ── Messages and stages ──────────────────────────────────────────────────

    #[test]
    fn new_message_keeps_supplied_id_and_fills_missing_ones() {
        let id = MessageId::new();
        let kept = NewMessage::user("hi").with_id(id).into_message();
        assert_eq!(kept.id, id);
        assert_eq!(kept.role, Role::User);

        let a = NewMessage::assistant("x").into_message();
        let b = NewMessage::assistant("x").into_message();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn stages_are_ordered_and_only_complete_is_terminal() {
        assert!(Stage::Requirements < Stage::Solution);
        assert!(Stage::Improvise < Stage::Complete);
        assert_eq!(Stage::ALL.iter().filter(|s| s.is_terminal()).count(), 1);
        assert!(!Stage::Search.accepts_text());
        assert!(!Stage::Complete.accepts_text());
        assert_eq!(Stage::Improvise.index(), 3);
    }

    // ── MygoError display messages ───────────────────────────────────────────

    #[test]
    fn error_status_display() {
        let err = MygoError::Status {
            operation: "ask-yoda".to_string(),
            status: 500,
            message: "model overloaded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("ask-yoda"));
        assert!(msg.contains("model overloaded"));
    }

    #[test]
    fn error_not_binary_display() {
        let err = MygoError::NotBinary {
            operation: "generate-spec".to_string(),
            message: "template missing".to_string(),
        };
        assert!(err.to_string().contains("received JSON"));
        assert!(err.to_string().contains("template missing"));
    }
}
