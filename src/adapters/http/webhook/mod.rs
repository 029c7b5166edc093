//! HTTP adapter for the Stripe webhook endpoint.
//!
//! - `POST /api/webhooks/stripe` - Verify and dispatch a Stripe event
//! - `GET /health` - Liveness check

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::WebhookAck;
pub use handlers::{WebhookApiError, WebhookAppState, STRIPE_SIGNATURE_HEADER};
pub use routes::{webhook_router, webhook_routes};
