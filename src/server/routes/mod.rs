//! API routes and handlers.

mod teams;

use axum::{Router, routing::get};

use super::state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(teams::top_default))
        .route("/{count}", get(teams::top_count))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
