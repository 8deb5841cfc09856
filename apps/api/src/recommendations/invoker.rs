//! Model Invoker — one bounded, cancellable call to the chat model.

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::llm_client::{ChatMessage, ChatModel, CompletionRequest, LlmError, Role};
use crate::recommendations::prompts::Prompt;

/// Generation parameters for a single invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvocationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.7,
            timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("model call exceeded {0:?}")]
    Timeout(Duration),

    #[error("model call failed: {0}")]
    Invocation(#[from] LlmError),
}

/// Calls the model once. On expiry of `params.timeout` the cancellation token
/// passed to the model fires and the call is reported as `Timeout`.
pub async fn invoke(
    model: &dyn ChatModel,
    prompt: &Prompt,
    params: &InvocationParams,
) -> Result<String, InvokeError> {
    let request = CompletionRequest {
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: prompt.instruction.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: prompt.context.clone(),
            },
        ],
        max_tokens: params.max_tokens,
        temperature: params.temperature,
    };

    let cancel = CancellationToken::new();
    let started = tokio::time::Instant::now();

    let outcome = tokio::select! {
        result = model.complete(&request, cancel.child_token()) => result,
        _ = tokio::time::sleep(params.timeout) => {
            cancel.cancel();
            return Err(InvokeError::Timeout(params.timeout));
        }
    };

    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "model call finished");

    match outcome {
        Ok(text) => Ok(text),
        // A cancelled call can only come from our own deadline.
        Err(LlmError::Cancelled) => Err(InvokeError::Timeout(params.timeout)),
        Err(e) => Err(InvokeError::Invocation(e)),
    }
}
