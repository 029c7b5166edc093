//! PostgreSQL adapters - Database implementations for persistence ports.
//!
//! - `PostgresOrderStore` - Marks orders paid by checkout session id

mod order_store;

pub use order_store::PostgresOrderStore;
