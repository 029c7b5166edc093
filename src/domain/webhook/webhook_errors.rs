//! Webhook error types for Stripe webhook handling.
//!
//! Defines all error conditions that can occur during webhook processing,
//! with HTTP status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `stripe-signature` header could not be parsed.
    #[error("Unable to extract timestamp and signatures from header: {0}")]
    MalformedHeader(String),

    /// No v1 signature in the header matched the expected signature.
    #[error("No signatures found matching the expected signature for payload")]
    InvalidSignature,

    /// Webhook timestamp is older than the tolerance window.
    #[error("Timestamp outside the tolerance zone")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Timestamp is in the future beyond the allowed clock skew")]
    InvalidTimestamp,

    /// Verified payload could not be decoded into an event.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A downstream collaborator failed while handling a verified event.
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// A verified event could not be fulfilled from its own contents.
    #[error("Fulfilment failed: {0}")]
    Fulfilment(String),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    ///
    /// Failures after verification are worth a redelivery; a payload that
    /// failed verification once will fail it again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Collaborator(_) | WebhookError::Fulfilment(_)
        )
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine Stripe's retry behavior:
    /// - 2xx: Event acknowledged, no retry
    /// - 4xx: Client error, no retry
    /// - 5xx: Server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MalformedHeader(_)
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            WebhookError::Collaborator(_) | WebhookError::Fulfilment(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
