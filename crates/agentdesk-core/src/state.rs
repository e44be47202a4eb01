//! UI-agnostic conversation state
//!
//! The transcript and busy flag shown by every front end. The application
//! root owns a single [`Conversation`] and hands it by `&mut` to the ask
//! cycle; `append_message` and `set_busy` are the only ways to change it.

use serde::{Deserialize, Serialize};

/// Greeting shown before the visitor has asked anything.
pub const GREETING: &str =
    "Welcome! I'm your Fleetworthy AI Sales Agent. How can I help you today?";

/// A chat message in the agent conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// The sender of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Agent,
}

/// Ordered transcript plus the "request in flight" indicator.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    busy: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation that opens with the agent's greeting.
    pub fn with_greeting() -> Self {
        let mut conversation = Self::new();
        conversation.append_message(GREETING, ChatRole::Agent);
        conversation
    }

    pub fn append_message(&mut self, text: impl Into<String>, role: ChatRole) {
        self.messages.push(ChatMessage {
            role,
            content: text.into(),
        });
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut conversation = Conversation::new();
        conversation.append_message("first", ChatRole::User);
        conversation.append_message("second", ChatRole::Agent);
        conversation.append_message("third", ChatRole::User);

        let contents: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(conversation.last().unwrap().role, ChatRole::User);
    }

    #[test]
    fn test_with_greeting_starts_with_agent_message() {
        let conversation = Conversation::with_greeting();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::Agent);
        assert_eq!(conversation.messages()[0].content, GREETING);
        assert!(!conversation.is_busy());
    }

    #[test]
    fn test_busy_flag_toggles() {
        let mut conversation = Conversation::new();
        assert!(!conversation.is_busy());
        conversation.set_busy(true);
        assert!(conversation.is_busy());
        conversation.set_busy(false);
        assert!(!conversation.is_busy());
    }
}
