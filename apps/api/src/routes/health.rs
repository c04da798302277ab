use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub const LIVENESS_MESSAGE: &str = "🎵 Mumblr API is live!";

/// GET /
/// Plain-text liveness message.
pub async fn root_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// GET /health
/// Returns a simple status object with service version and model.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "mumblr-api",
        "model": state.generator.model(),
    }))
}
