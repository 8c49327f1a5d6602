//! Chat engine
//!
//! The ChatEngine runs one exchange against a session's conversation:
//! 1. Seeds the system prompt on a fresh conversation
//! 2. Appends the user message
//! 3. Sends the whole history to the completion service
//! 4. Appends the reply and applies the turn window
//!
//! The conversation lock is held for the whole exchange, so two requests in
//! the same session never interleave their messages.

use std::sync::Arc;

use crate::providers::{CompletionClient, ProviderError};

use super::session::SessionContext;

/// Errors from the chat engine
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// The core chat engine
pub struct ChatEngine {
    client: Arc<dyn CompletionClient>,
    system_prompt: String,
    max_turns: usize,
}

impl ChatEngine {
    pub fn new(client: Arc<dyn CompletionClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
            max_turns: 0,
        }
    }

    /// Cap stored history to the newest `max_turns` exchanges, 0 for no cap
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Run one user message through the session's conversation and return
    /// the assistant's reply.
    pub async fn reply(&self, session: &SessionContext, message: &str) -> Result<String, ChatError> {
        let mut conversation = session.conversation.lock().await;

        if conversation.start(&self.system_prompt) {
            tracing::debug!(session = %session.id, "started conversation");
        }
        conversation.add_user(message);

        let reply = match self.client.complete(conversation.messages()).await {
            Ok(reply) => reply,
            Err(e) => {
                // keep user/assistant alternation intact for the next attempt
                conversation.retract_user();
                tracing::warn!(
                    session = %session.id,
                    provider = self.client.name(),
                    error = %e,
                    "completion failed"
                );
                return Err(e.into());
            }
        };

        conversation.add_assistant(&reply);

        let dropped = conversation.truncate_turns(self.max_turns);
        if dropped > 0 {
            tracing::debug!(session = %session.id, dropped, "trimmed conversation window");
        }

        tracing::info!(
            session = %session.id,
            messages = conversation.len(),
            "chat exchange complete"
        );

        Ok(reply)
    }
}
