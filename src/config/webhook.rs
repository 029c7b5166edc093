//! Webhook verification and dispatch configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::{
    CollaboratorFailurePolicy, DEFAULT_CLOCK_SKEW_SECS, DEFAULT_TOLERANCE_SECS,
};

/// Webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Maximum event age in seconds
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: i64,

    /// Accepted clock skew for future timestamps in seconds
    #[serde(default = "default_clock_skew")]
    pub clock_skew_secs: i64,

    /// Response when fulfilment collaborators fail
    #[serde(default)]
    pub failure_policy: CollaboratorFailurePolicy,
}

impl WebhookConfig {
    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tolerance_secs <= 0 {
            return Err(ValidationError::InvalidTolerance);
        }
        if self.clock_skew_secs < 0 {
            return Err(ValidationError::InvalidClockSkew);
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: default_tolerance(),
            clock_skew_secs: default_clock_skew(),
            failure_policy: CollaboratorFailurePolicy::default(),
        }
    }
}

fn default_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

fn default_clock_skew() -> i64 {
    DEFAULT_CLOCK_SKEW_SECS
}
