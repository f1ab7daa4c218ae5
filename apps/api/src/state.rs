use std::sync::Arc;

use crate::llm_client::GenerativeModel;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backs the `interviews` and `feedback` collections. Chosen via STORE_BACKEND.
    pub store: Arc<dyn DocumentStore>,
    /// Default: `LlmClient` (Gemini).
    pub model: Arc<dyn GenerativeModel>,
}
