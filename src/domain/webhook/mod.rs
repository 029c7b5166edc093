//! Stripe webhook domain module.
//!
//! Authenticates and decodes inbound Stripe deliveries.
//!
//! # Module Structure
//!
//! - `webhook_verifier` - HMAC-SHA256 signature and timestamp checks
//! - `stripe_event` - Event envelope, type dispatch key, `VerifiedEvent`
//! - `checkout_session` - Typed view of `checkout.session` objects
//! - `webhook_errors` - Error taxonomy with HTTP status mapping
//! - `failure_policy` - Response policy when fulfilment fails

mod checkout_session;
mod failure_policy;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use checkout_session::CheckoutSessionObject;
pub use failure_policy::CollaboratorFailurePolicy;
pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType, VerifiedEvent};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{
    RawPayload, SignatureHeader, StripeWebhookVerifier, DEFAULT_CLOCK_SKEW_SECS,
    DEFAULT_TOLERANCE_SECS,
};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
