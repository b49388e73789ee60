use crate::llm::Message;

/// Ordered, session-scoped log of exchanged messages. Append-only apart from
/// [`ChatHistoryStore::clear`].
#[derive(Debug, Clone, Default)]
pub struct ChatHistoryStore {
    messages: Vec<Message>,
}

impl ChatHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Up to `n` messages immediately before the most recent one.
    ///
    /// The most recent message is the user's current, unanswered question and
    /// is never part of the window.
    pub fn recent_window(&self, n: usize) -> Vec<Message> {
        let end = self.messages.len().saturating_sub(1);
        let start = end.saturating_sub(n);
        self.messages[start..end].to_vec()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
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

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
