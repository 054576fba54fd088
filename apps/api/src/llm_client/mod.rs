//! LLM Client — the single point of entry for all text-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the model provider directly.
//! The pipeline only sees the `TextCompleter` trait, so tests can swap in a stub.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

#[cfg(test)]
pub mod testing;

use prompts::{SYSTEM_INSTRUCTION, TEMPERATURE};

/// Default cap on generated tokens for a single completion.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("OpenAI API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("OpenAI API error: malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("OpenAI API error: response contained no message content")]
    EmptyContent,
}

impl ProviderError {
    /// Transport failures, 429 and 5xx are worth another attempt; everything else is permanent.
    fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(_) => true,
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Anything that can turn a prompt into generated text.
///
/// Carried in `AppState` as `Arc<dyn TextCompleter>`.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Chat-completion client shared by every request.
/// Cloning is cheap: the underlying reqwest pool is reference counted.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_attempts: u32,
    backoff_base: Duration,
}

impl LlmClient {
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            endpoint: format!("{}/chat/completions", config.openai_base_url),
            model: config.openai_model.clone(),
            max_attempts: config.llm_max_attempts.max(1),
            backoff_base: DEFAULT_BACKOFF_BASE,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the first backoff delay; later delays double from it.
    #[cfg(test)]
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// One HTTP round trip, no retry.
    async fn call_once(&self, body: &ChatRequest<'_>) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .into_text()
            .map(|content| content.trim().to_string())
            .ok_or(ProviderError::EmptyContent)
    }
}

#[async_trait]
impl TextCompleter for LlmClient {
    /// Retries transient failures with exponential backoff (base, 2×base, 4×base…).
    /// Permanent failures and the last transient failure surface unchanged.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let mut attempt: u32 = 0;

        loop {
            if attempt > 0 {
                let delay = self.backoff_base * (1u32 << (attempt - 1).min(10));
                warn!(
                    "Completion attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.call_once(&body).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt + 1 < self.max_attempts => {
                    warn!("Transient provider failure: {e}");
                }
                Err(e) => return Err(e),
            }

            attempt += 1;
        }
    }
}
