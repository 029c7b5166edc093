//! Response bodies for the webhook endpoint.

use serde::Serialize;

/// Acknowledgement returned to Stripe for every accepted event.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}
