/// LLM Client — the single point of entry for all model calls in Compass.
///
/// ARCHITECTURAL RULE: No other module may call the model service directly.
/// All LLM interactions MUST go through the `ChatModel` trait defined here.
///
/// One attempt per call. There is no retry or provider failover; callers
/// bound the call with a cancellation token and fall back on failure.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub mod prompts;

/// Upper bound on a single HTTP exchange. The per-call budget enforced by the
/// invoker is much tighter; this only guards against a hung socket.
const HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call was cancelled")]
    Cancelled,
}

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Everything the model service needs for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A chat model capable of producing a single text completion.
///
/// Implementations must stop work and return `LlmError::Cancelled` once
/// `cancel` fires.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for a chat-completions deployment.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    deployment: String,
}

impl LlmClient {
    pub fn new(endpoint: String, api_key: String, deployment: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()?,
            endpoint,
            api_key,
            deployment,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatCompletionBody {
            model: &self.deployment,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let completion: ChatCompletionResponse = serde_json::from_slice(&bytes)?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "LLM call succeeded"
            );
        }

        completion
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<String, LlmError> {
        // Dropping the in-flight request future aborts the HTTP exchange.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LlmError::Cancelled),
            result = self.send(request) => result,
        }
    }
}
