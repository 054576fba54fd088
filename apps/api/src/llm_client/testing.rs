//! Scripted `TextCompleter` for pipeline and router tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ProviderError, TextCompleter};
use crate::analysis::AnalysisMode;
use crate::config::Config;

/// Config pointing the provider at `base_url` with a throwaway key.
pub fn test_config(base_url: String, max_attempts: u32) -> Config {
    Config {
        openai_api_key: "sk-test".to_string(),
        openai_base_url: base_url,
        openai_model: "gpt-4-turbo-preview".to_string(),
        llm_timeout_secs: 5,
        llm_max_attempts: max_attempts,
        default_mode: AnalysisMode::CompetitorBreakdown,
        port: 0,
        rust_log: "info".to_string(),
    }
}

/// Replays canned responses in order and records every prompt it was given.
#[derive(Default)]
pub struct ScriptedCompleter {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<(String, u32)>>,
}

impl ScriptedCompleter {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every step succeeds with the given text, in order.
    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub fn max_tokens_seen(&self) -> Vec<u32> {
        self.prompts.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextCompleter for ScriptedCompleter {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyContent))
    }
}

/// Shorthand for a non-retryable provider failure.
pub fn api_error(status: u16, message: &str) -> ProviderError {
    ProviderError::Api {
        status,
        message: message.to_string(),
    }
}
