//! Domain layer containing the gateway's business types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, state machine, validation errors)
//! - `payment` - Checkout sessions, money, payment tokens, webhook verification
pub mod foundation;
pub mod payment;
