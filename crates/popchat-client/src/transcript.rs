//! The append-only chat transcript.

use crate::message::{Message, Sender};

/// Ordered messages plus the number of outstanding "typing" placeholders.
///
/// Messages are never removed or edited once pushed.  Placeholders are not
/// messages; each in-flight chat request holds one until it resolves.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    typing: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        tracing::debug!(sender = ?message.sender, len = message.body.len(), "transcript line appended");
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages from `sender`.
    pub fn count(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender == sender).count()
    }

    pub fn show_typing(&mut self) {
        self.typing += 1;
    }

    pub fn hide_typing(&mut self) {
        self.typing = self.typing.saturating_sub(1);
    }

    /// Whether at least one placeholder is showing.
    pub fn is_typing(&self) -> bool {
        self.typing > 0
    }

    pub fn typing_count(&self) -> usize {
        self.typing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order() {
        let mut t = Transcript::new();
        t.push(Message::user("a"));
        t.push(Message::bot("b"));
        let bodies: Vec<&str> = t.messages().iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["a", "b"]);
        assert_eq!(t.count(Sender::User), 1);
        assert_eq!(t.last().map(|m| m.sender), Some(Sender::Bot));
    }

    #[test]
    fn typing_counts_overlapping_requests() {
        let mut t = Transcript::new();
        t.show_typing();
        t.show_typing();
        t.hide_typing();
        assert!(t.is_typing());
        t.hide_typing();
        assert!(!t.is_typing());
    }

    #[test]
    fn hide_typing_saturates() {
        let mut t = Transcript::new();
        t.hide_typing();
        assert_eq!(t.typing_count(), 0);
        assert!(t.is_empty());
    }
}
