//! HTTP handlers for the Stripe webhook endpoint.
//!
//! These handlers connect Axum routes to signature verification and the
//! dispatch command handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::application::handlers::webhook::{
    DispatchStripeEventCommand, DispatchStripeEventHandler,
};
use crate::domain::webhook::{
    CollaboratorFailurePolicy, RawPayload, StripeWebhookVerifier, WebhookError,
};
use crate::ports::{ActivationService, OrderStore};

use super::dto::WebhookAck;

/// Header carrying Stripe's timestamped signatures.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for webhook requests.
///
/// Immutable after startup and cloned per request. `verifier` is `None`
/// when no webhook secret is configured; every delivery is then rejected.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Option<Arc<StripeWebhookVerifier>>,
    pub activation: Arc<dyn ActivationService>,
    pub orders: Arc<dyn OrderStore>,
    pub failure_policy: CollaboratorFailurePolicy,
    pub require_livemode: bool,
}

impl WebhookAppState {
    pub fn new(
        verifier: Option<StripeWebhookVerifier>,
        activation: Arc<dyn ActivationService>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            verifier: verifier.map(Arc::new),
            activation,
            orders,
            failure_policy: CollaboratorFailurePolicy::default(),
            require_livemode: false,
        }
    }

    pub fn with_failure_policy(mut self, policy: CollaboratorFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }

    /// Create the dispatch handler from the shared state.
    pub fn dispatch_handler(&self) -> DispatchStripeEventHandler {
        DispatchStripeEventHandler::new(self.activation.clone(), self.orders.clone())
            .with_failure_policy(self.failure_policy)
            .with_require_livemode(self.require_livemode)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/stripe - Receive a Stripe webhook delivery
pub async fn receive_stripe_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let (verifier, signature) = match (state.verifier.as_deref(), signature) {
        (Some(verifier), Some(signature)) => (verifier, signature),
        (verifier, signature) => {
            warn!(
                secret_configured = verifier.is_some(),
                signature_present = signature.is_some(),
                "Rejecting webhook without secret or signature"
            );
            return Err(WebhookApiError::MissingSecretOrSignature);
        }
    };

    let payload = RawPayload::from(body);
    let event = verifier.verify(&payload, signature).map_err(|e| {
        warn!(error = %e, payload_bytes = payload.as_bytes().len(), "Webhook verification failed");
        e
    })?;

    state
        .dispatch_handler()
        .handle(DispatchStripeEventCommand { event })
        .await?;

    Ok(Json(WebhookAck::received()))
}

/// Any non-POST method on the webhook route. The body is never read.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        "Method Not Allowed",
    )
}

/// GET /health - Liveness check
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to plain-text HTTP responses.
#[derive(Debug)]
pub enum WebhookApiError {
    /// No `stripe-signature` header, or no webhook secret configured.
    MissingSecretOrSignature,
    /// Verification, decoding, or fulfilment failed.
    Webhook(WebhookError),
}

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        match self {
            WebhookApiError::MissingSecretOrSignature => (
                StatusCode::BAD_REQUEST,
                "Webhook secret or signature missing",
            )
                .into_response(),
            WebhookApiError::Webhook(err) => {
                (err.status_code(), format!("Webhook Error: {}", err)).into_response()
            }
        }
    }
}
