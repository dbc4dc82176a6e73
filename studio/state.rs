use std::sync::Arc;

use product_studio::{GeminiClient, ResizeService, StudioConfig};

/// Shared state type — an `Arc<ResizeService>` passed to every handler.
///
/// The service guards its own blob store and limiter, so no outer lock is
/// needed.
pub type SharedState = Arc<ResizeService>;

/// Wires the Gemini-backed service from `config`.
pub fn build_state(config: &StudioConfig) -> SharedState {
    Arc::new(ResizeService::new(Box::new(GeminiClient::from_config(config))))
}
