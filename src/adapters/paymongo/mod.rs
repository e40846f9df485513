//! PayMongo checkout provider adapter.
//!
//! Implements the `CheckoutProvider` port for PayMongo hosted checkout:
//! - Checkout session creation
//! - Checkout session retrieval
//!
//! Webhook payload types and signature verification live in the payment
//! domain, since they involve no I/O.
//!
//! # Configuration
//!
//! - `PAYMONGO_GATEWAY__PAYMONGO__SECRET_KEY`: PayMongo secret API key

mod api_types;
mod mock_checkout_provider;
mod paymongo_adapter;

pub use mock_checkout_provider::MockCheckoutProvider;
pub use paymongo_adapter::{
    PayMongoCheckoutAdapter, PayMongoConfig, CONNECT_TIMEOUT, DEFAULT_API_BASE_URL,
    REQUEST_TIMEOUT,
};
