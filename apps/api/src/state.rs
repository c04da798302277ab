use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::lyrics::builder::PromptOptions;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. `LlmClient` in production, a stub in tests.
    pub generator: Arc<dyn TextGenerator>,
    pub prompt_options: PromptOptions,
}
