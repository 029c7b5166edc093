//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHECKOUT_WEBHOOK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use checkout_webhook::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod collaborators;
mod error;
mod payment;
mod server;
mod webhook;

pub use collaborators::CollaboratorsConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so loading succeeds with no environment at
/// all; [`AppConfig::validate()`] reports what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Stripe keys)
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Signature tolerance and failure policy
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Activation service and order database
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHECKOUT_WEBHOOK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHECKOUT_WEBHOOK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHECKOUT_WEBHOOK__PAYMENT__STRIPE_WEBHOOK_SECRET=whsec_...`
    ///   -> `payment.stripe_webhook_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHECKOUT_WEBHOOK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, checking sections in order:
    /// server, payment, webhook, collaborators.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.webhook.validate()?;
        self.collaborators.validate()?;
        Ok(())
    }

    /// Validate before serving.
    ///
    /// Every section is checked. Outside production a missing Stripe
    /// credential is handed back as a warning so the server can start and
    /// reject deliveries; any other error is fatal everywhere.
    pub fn validate_for_startup(&self) -> Result<Option<ValidationError>, ValidationError> {
        self.server.validate()?;
        self.webhook.validate()?;
        self.collaborators.validate()?;
        match self.payment.validate() {
            Ok(()) => Ok(None),
            Err(e @ ValidationError::MissingRequired(_)) if !self.is_production() => Ok(Some(e)),
            Err(e) => Err(e),
        }
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
