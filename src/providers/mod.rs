//! Completion service integrations

mod openai_compat;

use async_trait::async_trait;
use thiserror::Error;

use crate::conversation::Message;

pub use openai_compat::{OpenAICompatConfig, OpenAICompatProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Anything that can turn an ordered message history into the next reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError>;
}
