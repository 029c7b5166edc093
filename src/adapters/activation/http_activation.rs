//! HTTP activation adapter - calls an internal activation endpoint.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpActivationConfig::new("https://accounts.internal/activations")
//!     .with_token(token)
//!     .with_timeout(Duration::from_secs(5));
//!
//! let activation = HttpActivationService::new(config)?;
//! ```
//!
//! Sends `POST {url}` with body `{"reference": "<client_reference_id>"}`.
//! Any 2xx is success; 4xx is a rejection, everything else is treated as
//! the service being unavailable.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::ports::{ActivationService, CollaboratorError};

/// Configuration for the HTTP activation adapter.
#[derive(Debug, Clone)]
pub struct HttpActivationConfig {
    /// Activation endpoint URL.
    pub url: String,
    /// Optional bearer token.
    token: Option<SecretString>,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpActivationConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the bearer token sent with every activation.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct ActivationRequest<'a> {
    reference: &'a str,
}

/// Activation service backed by an HTTP endpoint.
pub struct HttpActivationService {
    config: HttpActivationConfig,
    client: Client,
}

impl HttpActivationService {
    /// Creates the adapter, building a client with the configured timeout.
    pub fn new(config: HttpActivationConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl ActivationService for HttpActivationService {
    async fn activate(&self, client_reference_id: &str) -> Result<(), CollaboratorError> {
        let mut request = self
            .client
            .post(&self.config.url)
            .json(&ActivationRequest {
                reference: client_reference_id,
            });
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CollaboratorError::Unavailable("activation request timed out".to_string())
            } else {
                CollaboratorError::Unavailable(format!("activation request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = format!("activation endpoint returned {}: {}", status.as_u16(), body);
        if status.is_client_error() {
            Err(CollaboratorError::Rejected(message))
        } else {
            Err(CollaboratorError::Unavailable(message))
        }
    }
}
