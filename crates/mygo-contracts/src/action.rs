//! Follow-up actions attached to assistant messages.
//!
//! Actions are data, not behaviour. The `kind` is fixed when the action is
//! created, so the dispatcher switches on a closed enumeration instead of
//! re-parsing strings. The string `id` survives as the stable wire and
//! display identifier; `ActionKind::from_id` is the only place ids are parsed.

use serde::{Deserialize, Serialize};

/// Id prefixes that mark a quick suggestion: invoking one copies its label
/// into the input draft.
pub const SUGGESTION_PREFIXES: &[&str] = &["suggest-", "ask-", "try-"];

/// Visual weight of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Primary,
    Secondary,
    Outline,
}

/// The closed set of behaviours an action can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Ask the page router to open the full editor for the active agent.
    OpenEditor,
    /// Ask the page router to open source configuration.
    OpenSettings,
    /// List configured document sources.
    ListSources,
    /// Sync one source.
    SyncSource { source_id: String },
    /// Sync every configured source.
    SyncAll,
    /// Multi-step sync from the connected Cloud ALM system.
    SyncConnected,
    /// Sync one project of a connected source.
    SyncProject { source_id: String, project_id: String },
    /// Copy the label into the input draft without submitting.
    Suggestion,
    /// Solution discovery: look up prior art for the current proposal.
    SearchSimilar,
    /// Solution discovery: accept the current proposal as final.
    ProceedToSpec,
    /// Solution discovery: hand the final solution to spec creation.
    CreateSpec,
    /// Anything else. Ignored by the dispatcher.
    Unknown,
}

impl ActionKind {
    /// Parse a wire id. First matching rule wins; unknown ids map to `Unknown`.
    pub fn from_id(id: &str) -> Self {
        match id {
            "open-editor" => return ActionKind::OpenEditor,
            "open-settings" => return ActionKind::OpenSettings,
            "search-similar" => return ActionKind::SearchSimilar,
            "proceed-to-spec" => return ActionKind::ProceedToSpec,
            "create-spec" => return ActionKind::CreateSpec,
            "list-sources" => return ActionKind::ListSources,
            "sync-all" => return ActionKind::SyncAll,
            "sync-calm" => return ActionKind::SyncConnected,
            _ => {}
        }

        if let Some(source_id) = id.strip_prefix("sync-source:").and_then(id_part) {
            return ActionKind::SyncSource { source_id };
        }

        if let Some(rest) = id.strip_prefix("sync-project:") {
            if let Some((source, project)) = rest.split_once(':') {
                if let (Some(source_id), Some(project_id)) = (id_part(source), id_part(project)) {
                    return ActionKind::SyncProject {
                        source_id,
                        project_id,
                    };
                }
            }
        }

        if SUGGESTION_PREFIXES.iter().any(|p| id.starts_with(p)) {
            return ActionKind::Suggestion;
        }

        ActionKind::Unknown
    }

    /// The canonical wire id for this kind.
    ///
    /// `Suggestion` and `Unknown` have no canonical id; callers supply one.
    pub fn canonical_id(&self) -> Option<String> {
        let id = match self {
            ActionKind::OpenEditor => "open-editor".to_string(),
            ActionKind::OpenSettings => "open-settings".to_string(),
            ActionKind::ListSources => "list-sources".to_string(),
            ActionKind::SyncSource { source_id } => {
                format!("sync-source:{}", urlencoding::encode(source_id))
            }
            ActionKind::SyncAll => "sync-all".to_string(),
            ActionKind::SyncConnected => "sync-calm".to_string(),
            ActionKind::SyncProject {
                source_id,
                project_id,
            } => format!(
                "sync-project:{}:{}",
                urlencoding::encode(source_id),
                urlencoding::encode(project_id)
            ),
            ActionKind::SearchSimilar => "search-similar".to_string(),
            ActionKind::ProceedToSpec => "proceed-to-spec".to_string(),
            ActionKind::CreateSpec => "create-spec".to_string(),
            ActionKind::Suggestion | ActionKind::Unknown => return None,
        };
        Some(id)
    }
}

/// Decode one percent-encoded id segment. Empty or malformed segments are `None`.
fn id_part(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

/// A labelled, user-invokable follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireAction", into = "WireAction")]
pub struct Action {
    pub id: String,
    pub label: String,
    pub emphasis: Emphasis,
    pub kind: ActionKind,
}

impl Action {
    /// Create an action with the kind's canonical id.
    ///
    /// For `Suggestion` and `Unknown` the id falls back to `"unknown"`; use
    /// `Action::suggestion` or `Action::from_wire` for those.
    pub fn new(kind: ActionKind, label: impl Into<String>, emphasis: Emphasis) -> Self {
        let id = kind.canonical_id().unwrap_or_else(|| "unknown".to_string());
        Self {
            id,
            label: label.into(),
            emphasis,
            kind,
        }
    }

    /// Create a quick suggestion. `slug` is appended to the `suggest-` prefix.
    pub fn suggestion(slug: &str, label: impl Into<String>) -> Self {
        Self {
            id: format!("suggest-{}", slug),
            label: label.into(),
            emphasis: Emphasis::Outline,
            kind: ActionKind::Suggestion,
        }
    }

    /// Rebuild an action received over the wire, deriving its kind from `id`.
    pub fn from_wire(id: impl Into<String>, label: impl Into<String>, emphasis: Emphasis) -> Self {
        let id = id.into();
        let kind = ActionKind::from_id(&id);
        Self {
            id,
            label: label.into(),
            emphasis,
            kind,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct WireAction {
    id: String,
    label: String,
    emphasis: Emphasis,
}

impl From<WireAction> for Action {
    fn from(wire: WireAction) -> Self {
        Action::from_wire(wire.id, wire.label, wire.emphasis)
    }
}

impl From<Action> for WireAction {
    fn from(action: Action) -> Self {
        WireAction {
            id: action.id,
            label: action.label,
            emphasis: action.emphasis,
        }
    }
}
