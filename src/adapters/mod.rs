//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `paymongo` - PayMongo hosted checkout (`CheckoutProvider`)
//! - `uisp` - UISP billing API (`BillingSystem`)
//! - `storage` - Checkout session persistence (`SessionStore`)
//! - `http` - Axum routes and handlers

pub mod http;
pub mod paymongo;
pub mod storage;
pub mod uisp;

pub use paymongo::{MockCheckoutProvider, PayMongoCheckoutAdapter, PayMongoConfig};
pub use storage::{FileSessionStore, InMemorySessionStore};
pub use uisp::{MockBillingSystem, UispBillingAdapter, UispConfig};
