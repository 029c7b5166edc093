//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: Option<SecretString>,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<SecretString>,

    /// Only dispatch events created in live mode
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.api_key().is_some_and(|key| key.starts_with("sk_test_"))
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.api_key().is_some_and(|key| key.starts_with("sk_live_"))
    }

    /// Webhook signing secret, if one is configured and non-empty
    pub fn webhook_secret(&self) -> Option<&str> {
        self.stripe_webhook_secret
            .as_ref()
            .map(|secret| secret.expose_secret().as_str())
            .filter(|secret| !secret.is_empty())
    }

    fn api_key(&self) -> Option<&str> {
        self.stripe_api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.is_empty())
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Malformed values are reported ahead of missing ones.
        if let Some(api_key) = self.api_key() {
            if !api_key.starts_with("sk_") {
                return Err(ValidationError::InvalidStripeKey);
            }
        }
        if let Some(webhook_secret) = self.webhook_secret() {
            if !webhook_secret.starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }

        self.api_key()
            .ok_or(ValidationError::MissingRequired("STRIPE_API_KEY"))?;
        self.webhook_secret()
            .ok_or(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"))?;

        Ok(())
    }
}
