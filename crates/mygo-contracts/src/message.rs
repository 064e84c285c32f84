//! Conversation messages.
//!
//! A `NewMessage` is what handlers build; the message log turns it into a
//! `Message` by filling in any missing id and timestamp at append time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Unique identifier of a message within its log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub uuid::Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Transient rendering state shown instead of (or alongside) content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Info,
    Success,
    Error,
    Pending,
}

/// One stored turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl Message {
    pub fn is_pending(&self) -> bool {
        self.status == Some(MessageStatus::Pending)
    }
}

/// A message that has not been appended yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub id: Option<MessageId>,
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub actions: Vec<Action>,
    pub status: Option<MessageStatus>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// An assistant message rendered as a failure.
    pub fn error(content: impl Into<String>) -> Self {
        Self::assistant(content).with_status(MessageStatus::Error)
    }

    /// An assistant message rendered as an informational notice.
    pub fn info(content: impl Into<String>) -> Self {
        Self::assistant(content).with_status(MessageStatus::Info)
    }

    /// The placeholder shown while a backend call is outstanding.
    pub fn pending() -> Self {
        Self::assistant("Thinking...").with_status(MessageStatus::Pending)
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Materialize into a stored message, filling in id and timestamp if absent.
    pub fn into_message(self) -> Message {
        Message {
            id: self.id.unwrap_or_default(),
            role: self.role,
            content: self.content,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            actions: self.actions,
            status: self.status,
        }
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            timestamp: None,
            actions: Vec::new(),
            status: None,
        }
    }
}
