//! OrderStore port - persists payment state of checkout sessions.

use async_trait::async_trait;

use super::CollaboratorError;

/// Port for recording that an order was paid.
///
/// Writes are keyed by checkout session ID and are idempotent: marking an
/// already-paid order paid again is not an error.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Set the paid flag on the order created for `checkout_session_id`.
    ///
    /// Returns the number of orders updated. Zero means no order was ever
    /// recorded for that session, which is reported but not an error.
    async fn mark_paid(&self, checkout_session_id: &str, paid: bool)
        -> Result<u64, CollaboratorError>;
}
