//! Axum router configuration for the webhook endpoint.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, method_not_allowed, receive_stripe_webhook, WebhookAppState};

/// Create the Stripe webhook router.
///
/// Webhooks carry no user authentication; they are verified via signature.
///
/// # Routes
/// - `POST /stripe` - Receive Stripe webhooks (any other method gets 405)
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route(
        "/stripe",
        post(receive_stripe_webhook).fallback(method_not_allowed),
    )
}

/// Create the complete webhook module router.
///
/// Mounts the webhook routes at `/api/webhooks` next to the `/health` check.
///
/// # Example
///
/// ```ignore
/// let app = webhook_router().with_state(app_state);
/// ```
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new()
        .nest("/api/webhooks", webhook_routes())
        .route("/health", get(health))
}
