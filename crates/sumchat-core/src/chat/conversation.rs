//! Append-only conversation history sent to the provider on every turn.

use sumchat_types::llm::Message;

/// Ordered message history for one session.
///
/// The first message is always the system prompt, inserted once by
/// [`Conversation::new`]. After that only complete exchanges (one user
/// message followed by one assistant message) are appended, so the length
/// is always `1 + 2 * exchanges`.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation headed by the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
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

    /// Number of completed user/assistant exchanges.
    pub fn exchanges(&self) -> usize {
        (self.messages.len() - 1) / 2
    }

    pub fn system_prompt(&self) -> &str {
        self.messages[0].content()
    }

    /// The messages to send for a new turn: the full history followed by the
    /// pending user message. The history itself is left untouched until the
    /// turn completes.
    pub fn request_messages(&self, user_text: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend(self.messages.iter().cloned());
        messages.push(Message::user(user_text));
        messages
    }

    /// Commit a finished exchange to the history.
    pub fn record_exchange(&mut self, user_text: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::assistant(reply));
    }
}
