//! Payment handlers.
//!
//! ## Commands
//! - Initiating a checkout from a UISP payment token
//! - Processing PayMongo webhooks
//!
//! ## Queries
//! - Gateway status (session counts and recent sessions)

mod get_gateway_status;
mod handle_payment_webhook;
mod initiate_payment;

// Commands
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    WebhookSettings, PROVIDER_NAME,
};
pub use initiate_payment::{
    token_prefix, InitiatePaymentCommand, InitiatePaymentHandler, InitiatePaymentResult,
    InitiatePaymentSettings,
};

// Queries
pub use get_gateway_status::{
    GetGatewayStatusHandler, GetGatewayStatusQuery, GetGatewayStatusResult, DEFAULT_RECENT_LIMIT,
};
