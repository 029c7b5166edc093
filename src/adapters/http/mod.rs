//! HTTP adapters - REST API implementations.

pub mod webhook;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

// Re-export key types for convenience
pub use webhook::webhook_router;
pub use webhook::WebhookAppState;

/// Build the full application router with server-level middleware.
///
/// Adds per-request tracing spans, the request timeout, and the body size
/// limit from `server`.
pub fn router(state: WebhookAppState, server: &ServerConfig) -> Router {
    webhook_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(server.request_timeout()))
                .layer(DefaultBodyLimit::max(server.max_body_bytes)),
        )
        .with_state(state)
}
