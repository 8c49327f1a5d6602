//! OpenAI-compatible provider
//!
//! Works with any API that implements the OpenAI chat completions format:
//! OpenAI itself, Groq, or a local vLLM / LM Studio / Ollama `/v1` endpoint.
//! Only the first choice of a non-streaming completion is used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::conversation::Message;

use super::{CompletionClient, ProviderError};

/// OpenAI-compatible chat message
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Error response from API
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone)]
pub struct OpenAICompatConfig {
    /// Base URL for the API (e.g., https://api.openai.com/v1)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAICompatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: None,
            timeout_secs: 60,
        }
    }
}

impl From<&Config> for OpenAICompatConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.openai_base_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.request_timeout_secs,
        }
    }
}

/// OpenAI-compatible API provider
pub struct OpenAICompatProvider {
    config: OpenAICompatConfig,
    client: Client,
}

impl OpenAICompatProvider {
    pub fn new(config: OpenAICompatConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: messages.iter().map(ChatMessage::from).collect(),
            temperature: self.config.temperature,
        };

        let mut req_builder = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder.json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(ProviderError::InvalidResponse(format!(
                    "API error ({}): {}",
                    status, error_resp.error.message
                )));
            }
            return Err(ProviderError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {} - Body: {}", e, body))
        })?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, api_key: Option<&str>) -> OpenAICompatProvider {
        OpenAICompatProvider::new(OpenAICompatConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    fn history() -> Vec<Message> {
        vec![Message::system("Be brief."), Message::user("Hello")]
    }

    #[test]
    fn test_config_from_app_config() {
        let app = Config {
            openai_api_key: Some("sk-test".into()),
            model: "gpt-test".into(),
            request_timeout_secs: 5,
            ..Config::default()
        };
        let config = OpenAICompatConfig::from(&app);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-test");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_message_conversion() {
        let msg = Message::user("Hello");
        let chat_msg = ChatMessage::from(&msg);
        assert_eq!(chat_msg.role, "user");
        assert_eq!(chat_msg.content, "Hello");
    }

    #[tokio::test]
    async fn test_sends_history_and_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Hi there!"}},
                    {"message": {"role": "assistant", "content": "ignored"}}
                ],
                "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = provider_for(&server, Some("sk-test"))
            .complete(&history())
            .await
            .unwrap();
        assert_eq!(reply, "Hi there!");
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server, None)
            .complete(&history())
            .await
            .unwrap_err();
        match err {
            ProviderError::InvalidResponse(msg) => assert!(msg.contains("exceeded your current quota")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let result = provider_for(&server, None).complete(&history()).await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_null_content_becomes_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let reply = provider_for(&server, None).complete(&history()).await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn test_garbage_body_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let result = provider_for(&server, None).complete(&history()).await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }
}
