//! ActivationService port - grants whatever the buyer paid for.
//!
//! Called once per `checkout.session.completed` event that carries a
//! client reference. Stripe may redeliver the same event, so
//! implementations must tolerate repeated activation of one reference.

use async_trait::async_trait;

use super::CollaboratorError;

/// Port for activating a purchase identified by its client reference.
#[async_trait]
pub trait ActivationService: Send + Sync {
    /// Activate the purchase for `client_reference_id`.
    async fn activate(&self, client_reference_id: &str) -> Result<(), CollaboratorError>;
}
