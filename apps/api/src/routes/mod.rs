pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::lyrics::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/mumblr", post(handlers::handle_generate))
        .with_state(state)
}
