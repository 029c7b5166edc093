//! Order store adapters that need no database.

mod in_memory_order_store;
mod logging_order_store;

pub use in_memory_order_store::InMemoryOrderStore;
pub use logging_order_store::LoggingOrderStore;
