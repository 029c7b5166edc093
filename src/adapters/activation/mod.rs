//! Activation adapters - implementations of `ActivationService`.

mod http_activation;
mod logging_activation;

pub use http_activation::{HttpActivationConfig, HttpActivationService};
pub use logging_activation::LoggingActivationService;
