//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the status state machine trait and
//! validation errors that form the vocabulary of the gateway domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{CheckoutSessionId, ClientId, InvoiceId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
