//! Process bootstrap: tracing, collaborator wiring, and the HTTP server.

use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::activation::{
    HttpActivationConfig, HttpActivationService, LoggingActivationService,
};
use crate::adapters::http::{router, WebhookAppState};
use crate::adapters::orders::LoggingOrderStore;
use crate::adapters::postgres::PostgresOrderStore;
use crate::config::{AppConfig, ServerConfig, ValidationError};
use crate::domain::webhook::StripeWebhookVerifier;
use crate::ports::{ActivationService, CollaboratorError, OrderStore};

/// Errors that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Activation service setup failed: {0}")]
    Activation(#[from] CollaboratorError),

    #[error("Order database setup failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. Production logs are JSON.
pub fn init_tracing(server: &ServerConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Build the verifier from the payment and webhook sections.
///
/// Returns `None` when no webhook secret is configured.
pub fn build_verifier(config: &AppConfig) -> Option<StripeWebhookVerifier> {
    config.payment.webhook_secret().map(|secret| {
        StripeWebhookVerifier::new(secret)
            .with_tolerance(config.webhook.tolerance_secs)
            .with_clock_skew(config.webhook.clock_skew_secs)
    })
}

/// Wire collaborators and build the immutable request state.
///
/// Must run inside a Tokio runtime: the Postgres pool is created lazily and
/// connects on first use.
pub fn build_app_state(config: &AppConfig) -> Result<WebhookAppState, StartupError> {
    config.webhook.validate()?;
    config.collaborators.validate()?;
    let collaborators = &config.collaborators;

    let activation: Arc<dyn ActivationService> = match &collaborators.activation_url {
        Some(url) => {
            let mut http_config =
                HttpActivationConfig::new(url).with_timeout(collaborators.activation_timeout());
            if let Some(token) = &collaborators.activation_token {
                http_config = http_config.with_token(token.clone());
            }
            info!(url = %url, "Using HTTP activation service");
            Arc::new(HttpActivationService::new(http_config)?)
        }
        None => {
            warn!("No activation URL configured, activations will only be logged");
            Arc::new(LoggingActivationService::new())
        }
    };

    let orders: Arc<dyn OrderStore> = match &collaborators.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect_lazy(url)?;
            info!(table = %collaborators.orders_table, "Using PostgreSQL order store");
            Arc::new(PostgresOrderStore::new(pool, &collaborators.orders_table))
        }
        None => {
            warn!("No database URL configured, order updates will only be logged");
            Arc::new(LoggingOrderStore::new())
        }
    };

    let verifier = build_verifier(config);
    if verifier.is_none() {
        warn!("No Stripe webhook secret configured, every delivery will be rejected");
    }
    if config.payment.is_test_mode() {
        info!("Stripe API key is a test-mode key");
    }

    Ok(WebhookAppState::new(verifier, activation, orders)
        .with_failure_policy(config.webhook.failure_policy)
        .with_require_livemode(config.payment.require_livemode))
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: AppConfig) -> Result<(), StartupError> {
    let addr = config.server.socket_addr()?;
    let state = build_app_state(&config)?;
    let app = router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Webhook endpoint listening on http://{}/api/webhooks/stripe", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal, starting graceful shutdown"),
        _ = terminate => info!("Received terminate signal, starting graceful shutdown"),
    }
}
