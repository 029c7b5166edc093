//! Checkout Webhook - Stripe webhook receiver
//!
//! Accepts Stripe event deliveries, authenticates them against the webhook
//! signing secret, and fulfils `checkout.session.completed` events through
//! the activation service and order store. Every other event type is
//! acknowledged without action.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod startup;
