//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the payment handlers and the outside world. Adapters implement these ports.
//!
//! - `CheckoutProvider` - Hosted checkout sessions (PayMongo)
//! - `BillingSystem` - Payment tokens, invoices and payments (UISP)
//! - `SessionStore` - Durable checkout session tracking

mod billing_system;
mod checkout_provider;
mod session_store;

pub use billing_system::{BillingSystem, Invoice, NewPayment, RecordedPayment, ResolvedPaymentToken};
pub use checkout_provider::{
    CheckoutProvider, CheckoutSessionDetails, CreateCheckoutRequest, CreatedCheckout,
};
pub use session_store::{
    RecordingClaim, SessionStats, SessionStore, StatusUpdate, DEFAULT_MAX_SESSIONS,
    RECORDING_LEASE_SECS,
};
