//! Activation adapter that only records the request in the log.
//!
//! Used when no activation endpoint is configured.

use async_trait::async_trait;
use tracing::info;

use crate::ports::{ActivationService, CollaboratorError};

#[derive(Debug, Default, Clone)]
pub struct LoggingActivationService;

impl LoggingActivationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActivationService for LoggingActivationService {
    async fn activate(&self, client_reference_id: &str) -> Result<(), CollaboratorError> {
        info!(
            client_reference_id = %client_reference_id,
            "No activation service configured, activation logged only"
        );
        Ok(())
    }
}
