use std::sync::Arc;

use crate::career::CareerAssistant;
use crate::config::Config;
use crate::index::IndexStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<IndexStore>,
    /// Owns the LLM client, ranker and fallback coordinator.
    pub assistant: CareerAssistant,
    pub config: Config,
}
