//! Order store that only records updates in the log.
//!
//! Used when no order database is configured.

use async_trait::async_trait;
use tracing::info;

use crate::ports::{CollaboratorError, OrderStore};

#[derive(Debug, Default, Clone)]
pub struct LoggingOrderStore;

impl LoggingOrderStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderStore for LoggingOrderStore {
    async fn mark_paid(
        &self,
        checkout_session_id: &str,
        paid: bool,
    ) -> Result<u64, CollaboratorError> {
        info!(
            session_id = %checkout_session_id,
            paid,
            "No order database configured, update logged only"
        );
        Ok(1)
    }
}
