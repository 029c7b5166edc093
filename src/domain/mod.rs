//! Domain layer containing webhook authentication and event types.
//!
//! # Module Organization
//!
//! - `webhook` - Signature verification, event decoding, and error taxonomy

pub mod webhook;
