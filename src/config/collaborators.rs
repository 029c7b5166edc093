//! Fulfilment collaborator configuration
//!
//! Both collaborators are optional. Without an activation URL the logging
//! activation adapter is used; without a database URL the logging order
//! store is used.

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Collaborator configuration (activation service, order database)
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorsConfig {
    /// Endpoint that activates a purchase by client reference
    pub activation_url: Option<String>,

    /// Bearer token sent to the activation endpoint
    pub activation_token: Option<SecretString>,

    /// Activation request timeout in seconds
    #[serde(default = "default_activation_timeout")]
    pub activation_timeout_secs: u64,

    /// PostgreSQL connection URL for the order store
    pub database_url: Option<String>,

    /// Table holding orders keyed by `checkout_session_id`
    #[serde(default = "default_orders_table")]
    pub orders_table: String,
}

impl CollaboratorsConfig {
    /// Get activation timeout as Duration
    pub fn activation_timeout(&self) -> Duration {
        Duration::from_secs(self.activation_timeout_secs)
    }

    /// Validate collaborator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.activation_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidActivationUrl);
            }
        }
        if self.activation_timeout_secs == 0 || self.activation_timeout_secs > 120 {
            return Err(ValidationError::InvalidActivationTimeout);
        }
        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ValidationError::InvalidDatabaseUrl);
            }
        }
        if !is_valid_table_name(&self.orders_table) {
            return Err(ValidationError::InvalidTableName);
        }
        Ok(())
    }
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            activation_url: None,
            activation_token: None,
            activation_timeout_secs: default_activation_timeout(),
            database_url: None,
            orders_table: default_orders_table(),
        }
    }
}

/// Table names are interpolated into SQL, so only plain (optionally
/// schema-qualified) identifiers are accepted.
fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').count() <= 2
        && name.split('.').all(|part| {
            part.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn default_activation_timeout() -> u64 {
    10
}

fn default_orders_table() -> String {
    "orders".to_string()
}
