//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect webhook dispatch to external systems:
//! - `http` - Axum routes for the webhook endpoint
//! - `activation` - Activation service clients
//! - `orders` - Database-free order stores
//! - `postgres` - PostgreSQL order store

pub mod activation;
pub mod http;
pub mod orders;
pub mod postgres;

pub use activation::{HttpActivationConfig, HttpActivationService, LoggingActivationService};
pub use orders::{InMemoryOrderStore, LoggingOrderStore};
pub use postgres::PostgresOrderStore;
