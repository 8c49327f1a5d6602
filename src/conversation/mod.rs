//! Conversation types and state management

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Ordered history of one session. The first message, once present, is
/// always the system prompt.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the system prompt if nothing has been said yet.
    pub fn start(&mut self, prompt: &str) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.messages.push(Message::system(prompt));
        true
    }

    pub fn add_user(&mut self, content: &str) {
        self.messages.push(Message::user(content));
    }

    pub fn add_assistant(&mut self, content: &str) {
        self.messages.push(Message::assistant(content));
    }

    /// Drops the trailing user message, if that is what the last message is.
    pub fn retract_user(&mut self) -> Option<Message> {
        match self.messages.last() {
            Some(m) if m.role == Role::User => self.messages.pop(),
            _ => None,
        }
    }

    /// Keeps the system prompt plus the newest `max_turns` user/assistant
    /// pairs. `0` disables the cap.
    pub fn truncate_turns(&mut self, max_turns: usize) -> usize {
        if max_turns == 0 {
            return 0;
        }
        let head = usize::from(self.messages.first().map(|m| m.role) == Some(Role::System));
        let keep = max_turns.saturating_mul(2);
        let body = self.messages.len() - head;
        if body <= keep {
            return 0;
        }
        let excess = body - keep;
        self.messages.drain(head..head + excess);
        excess
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_turns(n: usize) -> Conversation {
        let mut conversation = Conversation::new();
        conversation.start("sys");
        for i in 0..n {
            conversation.add_user(&format!("q{}", i));
            conversation.add_assistant(&format!("a{}", i));
        }
        conversation
    }

    #[test]
    fn test_start_only_seeds_once() {
        let mut conversation = Conversation::new();
        assert!(conversation.start("sys"));
        assert!(!conversation.start("other"));
        assert_eq!(conversation.messages(), &[Message::system("sys")]);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }

    #[test]
    fn test_retract_user_only_pops_user() {
        let mut conversation = with_turns(1);
        assert!(conversation.retract_user().is_none());
        assert_eq!(conversation.len(), 3);

        conversation.add_user("pending");
        let popped = conversation.retract_user().unwrap();
        assert_eq!(popped.content, "pending");
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn test_truncate_keeps_system_and_newest_turns() {
        let mut conversation = with_turns(5);
        let dropped = conversation.truncate_turns(2);

        assert_eq!(dropped, 6);
        let contents: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["sys", "q3", "a3", "q4", "a4"]);
    }

    #[test]
    fn test_truncate_zero_is_unbounded() {
        let mut conversation = with_turns(30);
        assert_eq!(conversation.truncate_turns(0), 0);
        assert_eq!(conversation.len(), 61);
    }

    #[test]
    fn test_truncate_huge_cap_is_noop() {
        let mut conversation = with_turns(3);
        assert_eq!(conversation.truncate_turns(usize::MAX), 0);
        assert_eq!(conversation.len(), 7);
    }

    #[test]
    fn test_truncate_under_cap_is_noop() {
        let mut conversation = with_turns(2);
        assert_eq!(conversation.truncate_turns(2), 0);
        assert_eq!(conversation.len(), 5);
    }
}
