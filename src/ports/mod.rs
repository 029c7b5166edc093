//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! webhook dispatch and the systems that fulfil an order. Adapters
//! implement these ports.
//!
//! ## Fulfilment Ports
//!
//! - `ActivationService` - Grants access for a client reference
//! - `OrderStore` - Records the paid flag per checkout session

mod activation_service;
mod collaborator_error;
mod order_store;

pub use activation_service::ActivationService;
pub use collaborator_error::CollaboratorError;
pub use order_store::OrderStore;
