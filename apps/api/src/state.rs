use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextCompleter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, a scripted stub in tests.
    pub completer: Arc<dyn TextCompleter>,
    pub config: Config,
}
