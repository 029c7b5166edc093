//! Webhook handlers.
//!
//! ## Commands
//! - Dispatching verified Stripe events to fulfilment collaborators

mod dispatch_stripe_event;

pub use dispatch_stripe_event::{
    DispatchOutcome, DispatchStripeEventCommand, DispatchStripeEventHandler,
};
