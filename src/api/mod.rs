//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;
mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use routes::create_router;
pub use state::AppState;

/// Path prefix the resource API is served under
pub const API_PREFIX: &str = "/v1.1";

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Layers run last-added first: context -> logging -> handler
    let api_routes = create_router()
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::context_middleware));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest(API_PREFIX, api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
