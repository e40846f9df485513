//! Payment domain module.
//!
//! Checkout sessions, minor-unit money handling, payment tokens, webhook
//! signature verification and the error taxonomy shared by the payment
//! initiation and webhook pipelines.
//!
//! # Module Structure
//!
//! - `checkout_session` - Persisted checkout session record and its status machine
//! - `money` - Major/minor unit conversion
//! - `payment_token` - Resolved UISP payment token
//! - `paymongo_event` - Webhook payload types and paid checkout extraction
//! - `webhook_verifier` - `Paymongo-Signature` HMAC verification
//! - `errors` / `webhook_errors` - Typed failure kinds

mod checkout_session;
mod errors;
mod money;
mod payment_token;
mod paymongo_event;
mod webhook_errors;
mod webhook_verifier;

pub use checkout_session::{CheckoutSession, SessionStatus};
pub use errors::{BillingError, GatewayError, InitiatePaymentError, StoreError};
pub use money::{from_minor_units, to_minor_units, DEFAULT_MINIMUM_MINOR};
pub use payment_token::{MissingTokenField, PaymentToken};
pub use paymongo_event::{
    PaidCheckout, PaidCheckoutError, PayMongoEvent, CHECKOUT_PAID_EVENT, UNKNOWN_PAYMENT_METHOD,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{
    sign_payload, verify_signature, SignatureHeader, SignatureVerifier, SIGNATURE_HEADER,
};
