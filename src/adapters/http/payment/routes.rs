//! Axum router configuration for gateway endpoints.

use axum::{
    routing::{any, get},
    Router,
};

use super::handlers::{
    cancel, gateway_entry, health, pay, status, success, webhook, PaymentAppState,
};

/// Create the gateway router.
///
/// # Routes
///
/// ## Customer Endpoints
/// - `GET /pay?_token=...` - Redirect to a new PayMongo checkout
/// - `GET /success?invoice_id=...` - Checkout completed page
/// - `GET /cancel?invoice_id=...` - Checkout cancelled page
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhook` - PayMongo webhook; other methods get 405
///
/// ## Operations
/// - `GET /health` - Liveness
/// - `GET /status` - Mode, webhook URL and session summary
///
/// `/` accepts the same operations through `?action=pay|webhook|success|cancel`
/// and treats a missing action as `pay`, matching the links UISP generates.
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/", any(gateway_entry))
        // Customer endpoints
        .route("/pay", get(pay))
        .route("/success", get(success))
        .route("/cancel", get(cancel))
        // Webhook
        .route("/webhook", any(webhook))
        // Operations
        .route("/health", get(health))
        .route("/status", get(status))
}

/// Create the gateway router with its state attached.
pub fn payment_router(state: PaymentAppState) -> Router {
    payment_routes().with_state(state)
}
