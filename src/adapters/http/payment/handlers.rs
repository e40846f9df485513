//! HTTP handlers for gateway endpoints.
//!
//! These handlers connect Axum routes to the payment command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::payment::{
    token_prefix, GetGatewayStatusHandler, GetGatewayStatusQuery, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, InitiatePaymentCommand, InitiatePaymentHandler,
    InitiatePaymentSettings, WebhookSettings,
};
use crate::domain::payment::{
    InitiatePaymentError, SignatureVerifier, StoreError, WebhookError, SIGNATURE_HEADER,
};
use crate::ports::{BillingSystem, CheckoutProvider, SessionStore};

use super::dto::{
    webhook_error_body, GatewayQuery, GatewayStatusResponse, HealthResponse, WebhookResponse,
};
use super::pages::PageSettings;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Settings fixed at startup.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub initiate: InitiatePaymentSettings,
    pub webhook: WebhookSettings,
    pub pages: PageSettings,
    /// `test` or `live`.
    pub mode: &'static str,
    /// URL to register with PayMongo.
    pub webhook_url: String,
}

/// Ports and settings shared by every gateway route. Cloned per request.
#[derive(Clone)]
pub struct PaymentAppState {
    pub billing: Arc<dyn BillingSystem>,
    pub checkout_provider: Arc<dyn CheckoutProvider>,
    pub session_store: Arc<dyn SessionStore>,
    pub signature_verifier: Arc<SignatureVerifier>,
    pub settings: Arc<GatewaySettings>,
}

impl PaymentAppState {
    pub fn initiate_payment_handler(&self) -> InitiatePaymentHandler {
        InitiatePaymentHandler::new(
            self.billing.clone(),
            self.checkout_provider.clone(),
            self.session_store.clone(),
            self.settings.initiate.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.signature_verifier.clone(),
            self.session_store.clone(),
            self.billing.clone(),
            self.settings.webhook.clone(),
        )
    }

    pub fn status_handler(&self) -> GetGatewayStatusHandler {
        GetGatewayStatusHandler::new(self.session_store.clone())
    }

    fn pages(&self) -> &PageSettings {
        &self.settings.pages
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Entry Point
// ════════════════════════════════════════════════════════════════════════════════

/// ANY / - Dispatch on the `action` query parameter (default `pay`)
pub async fn gateway_entry(
    State(state): State<PaymentAppState>,
    method: Method,
    Query(query): Query<GatewayQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let action = query.action.clone().unwrap_or_else(|| "pay".to_string());
    match action.as_str() {
        "pay" => initiate(&state, query).await.into_response(),
        "webhook" => process_webhook(&state, method, &headers, body)
            .await
            .into_response(),
        "success" => show_success(&state, &query),
        "cancel" => show_cancel(&state, &query),
        other => {
            tracing::warn!(action = %other, "Unknown gateway action");
            state.pages().error(StatusCode::BAD_REQUEST, "Invalid action.")
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment Initiation
// ════════════════════════════════════════════════════════════════════════════════

/// GET /pay?_token=... - Start a PayMongo checkout for a UISP invoice
pub async fn pay(
    State(state): State<PaymentAppState>,
    Query(query): Query<GatewayQuery>,
) -> Result<Response, PaymentPageError> {
    initiate(&state, query).await
}

async fn initiate(
    state: &PaymentAppState,
    query: GatewayQuery,
) -> Result<Response, PaymentPageError> {
    let token = query.token.unwrap_or_default();
    tracing::info!(token = %token_prefix(&token), "Payment request received");

    let handler = state.initiate_payment_handler();
    let result = handler
        .handle(InitiatePaymentCommand { token })
        .await
        .map_err(|error| PaymentPageError {
            pages: state.pages().clone(),
            error,
        })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, result.checkout_url)]).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook
// ════════════════════════════════════════════════════════════════════════════════

/// ANY /webhook - Handle PayMongo webhook deliveries (POST only)
pub async fn webhook(
    State(state): State<PaymentAppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    process_webhook(&state, method, &headers, body).await
}

async fn process_webhook(
    state: &PaymentAppState,
    method: Method,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        method,
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    let result = handler.handle(cmd).await?;
    Ok(Json(WebhookResponse::from(&result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Customer Redirect Pages
// ════════════════════════════════════════════════════════════════════════════════

/// GET /success?invoice_id=... - Customer returned from a completed checkout
pub async fn success(
    State(state): State<PaymentAppState>,
    Query(query): Query<GatewayQuery>,
) -> Response {
    show_success(&state, &query)
}

/// GET /cancel?invoice_id=... - Customer abandoned the checkout
pub async fn cancel(
    State(state): State<PaymentAppState>,
    Query(query): Query<GatewayQuery>,
) -> Response {
    show_cancel(&state, &query)
}

fn show_success(state: &PaymentAppState, query: &GatewayQuery) -> Response {
    let invoice_id = query.invoice_id();
    tracing::info!(invoice_id = ?invoice_id, "Customer returned to success page");
    state.pages().success(invoice_id)
}

fn show_cancel(state: &PaymentAppState, query: &GatewayQuery) -> Response {
    let invoice_id = query.invoice_id();
    tracing::info!(invoice_id = ?invoice_id, "Customer cancelled payment");
    state.pages().cancel(invoice_id)
}

// ════════════════════════════════════════════════════════════════════════════════
// Operations
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /status - Mode, webhook URL and session summary
pub async fn status(
    State(state): State<PaymentAppState>,
) -> Result<impl IntoResponse, StatusApiError> {
    let handler = state.status_handler();
    let result = handler.handle(GetGatewayStatusQuery::default()).await?;

    let response = GatewayStatusResponse::new(
        state.settings.mode,
        state.settings.webhook_url.clone(),
        result,
    );
    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Payment initiation failure rendered as an HTML error page.
pub struct PaymentPageError {
    pages: PageSettings,
    error: InitiatePaymentError,
}

impl IntoResponse for PaymentPageError {
    fn into_response(self) -> Response {
        self.pages
            .error(StatusCode::INTERNAL_SERVER_ERROR, self.error.user_message())
    }
}

/// API error type that converts webhook errors to HTTP responses.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        (self.0.status_code(), Json(webhook_error_body(&self.0))).into_response()
    }
}

/// Session store failure on the status endpoint.
pub struct StatusApiError(StoreError);

impl From<StoreError> for StatusApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for StatusApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Failed to read session store");
        let body = serde_json::json!({ "error": "Session store unavailable" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
