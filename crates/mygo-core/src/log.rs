//! The message log: an ordered, append-only record of one conversation.
//!
//! Messages are never edited after append, with one exception: a pending
//! placeholder is settled exactly once, either replaced in place by id or,
//! if it is gone, followed by a freshly appended message.

use mygo_contracts::message::{Message, MessageId, NewMessage};

/// How a pending placeholder was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The placeholder was found and replaced in place, keeping its id.
    Replaced,
    /// No placeholder with that id remained, so the message was appended.
    Appended,
}

#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, assigning an id and timestamp if absent.
    ///
    /// A supplied id that is already present in the log is replaced by a
    /// fresh one so ids stay unique.
    pub fn append(&mut self, message: NewMessage) -> MessageId {
        let mut message = message.into_message();
        if self.contains(message.id) {
            message.id = MessageId::new();
        }
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Append the "Thinking..." placeholder shown while a call is outstanding.
    pub fn append_pending(&mut self) -> MessageId {
        self.append(NewMessage::pending())
    }

    /// Settle the pending placeholder `id` with its final message.
    pub fn settle(&mut self, id: MessageId, message: NewMessage) -> Settlement {
        match self
            .messages
            .iter()
            .position(|m| m.id == id && m.is_pending())
        {
            Some(index) => {
                let mut settled = message.into_message();
                settled.id = id;
                self.messages[index] = settled;
                Settlement::Replaced
            }
            None => {
                self.append(message);
                Settlement::Appended
            }
        }
    }

    /// Remove every message. The only removal operation.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// All messages, in append order.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn contains(&self, id: MessageId) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mygo_contracts::message::{MessageStatus, Role};

    #[test]
    fn append_preserves_order_and_assigns_ids() {
        let mut log = MessageLog::new();
        let a = log.append(NewMessage::user("first"));
        let b = log.append(NewMessage::assistant("second"));
        let c = log.append(NewMessage::user("first"));

        assert_ne!(a, b);
        assert_ne!(a, c);
        let contents: Vec<&str> = log.all().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "first"]);
    }

    #[test]
    fn duplicate_supplied_id_is_replaced() {
        let mut log = MessageLog::new();
        let id = MessageId::new();
        let first = log.append(NewMessage::user("a").with_id(id));
        let second = log.append(NewMessage::user("b").with_id(id));
        assert_eq!(first, id);
        assert_ne!(second, id);
        assert_eq!(log.len(), 2);
    }

    // ── Pending placeholders ─────────────────────────────────────────────────

    #[test]
    fn settle_replaces_the_placeholder_in_place() {
        let mut log = MessageLog::new();
        log.append(NewMessage::user("question"));
        let pending = log.append_pending();
        assert!(log.all()[1].is_pending());

        let settlement = log.settle(pending, NewMessage::assistant("answer"));

        assert_eq!(settlement, Settlement::Replaced);
        assert_eq!(log.len(), 2);
        let settled = &log.all()[1];
        assert_eq!(settled.id, pending);
        assert_eq!(settled.content, "answer");
        assert_eq!(settled.role, Role::Assistant);
        assert!(!settled.is_pending());
    }

    #[test]
    fn settle_appends_when_the_placeholder_is_gone() {
        let mut log = MessageLog::new();
        let pending = log.append_pending();
        log.clear();

        let settlement = log.settle(pending, NewMessage::error("failed"));

        assert_eq!(settlement, Settlement::Appended);
        assert_eq!(log.len(), 1);
        assert_eq!(log.all()[0].status, Some(MessageStatus::Error));
    }

    #[test]
    fn settle_never_overwrites_a_settled_message() {
        let mut log = MessageLog::new();
        let pending = log.append_pending();
        assert_eq!(
            log.settle(pending, NewMessage::assistant("one")),
            Settlement::Replaced
        );
        assert_eq!(
            log.settle(pending, NewMessage::assistant("two")),
            Settlement::Appended
        );
        let contents: Vec<&str> = log.all().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[test]
    fn every_settle_has_exactly_one_outcome() {
        for keep_placeholder in [true, false] {
            let mut log = MessageLog::new();
            let pending = log.append_pending();
            if !keep_placeholder {
                log.clear();
            }
            let before = log.len();
            let settlement = log.settle(pending, NewMessage::assistant("done"));
            let pending_left = log.all().iter().filter(|m| m.is_pending()).count();

            assert_eq!(pending_left, 0);
            match settlement {
                Settlement::Replaced => assert_eq!(log.len(), before),
                Settlement::Appended => assert_eq!(log.len(), before + 1),
            }
        }
    }

    #[test]
    fn clear_is_total() {
        let mut log = MessageLog::new();
        log.append(NewMessage::user("a"));
        log.append_pending();
        log.clear();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }
}
