use std::process::ExitCode;

use checkout_webhook::config::AppConfig;
use checkout_webhook::startup::{init_tracing, serve};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.server);

    match config.validate_for_startup() {
        Ok(None) => {}
        Ok(Some(e)) => {
            tracing::warn!(error = %e, "Incomplete configuration, continuing outside production");
        }
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return ExitCode::FAILURE;
        }
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server stopped with error");
            ExitCode::FAILURE
        }
    }
}
