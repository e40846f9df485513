//! HTTP DTOs (Data Transfer Objects) for gateway endpoints.
//!
//! Webhook responses keep the `{"status": ...}` shape PayMongo deliveries
//! have always been answered with.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{GetGatewayStatusResult, HandlePaymentWebhookResult};
use crate::domain::payment::{CheckoutSession, SessionStatus, WebhookError};
use crate::ports::SessionStats;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string accepted on the gateway entry point.
///
/// UISP links to `/?_token=...`, PayMongo redirects to
/// `/?action=success&invoice_id=...`, and webhooks may target
/// `/?action=webhook`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayQuery {
    pub action: Option<String>,
    #[serde(rename = "_token")]
    pub token: Option<String>,
    pub invoice_id: Option<String>,
}

impl GatewayQuery {
    /// Invoice id from a redirect, if it is numeric.
    pub fn invoice_id(&self) -> Option<u64> {
        self.invoice_id.as_deref().and_then(|id| id.trim().parse().ok())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body returned to PayMongo for a processed delivery.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<&HandlePaymentWebhookResult> for WebhookResponse {
    fn from(result: &HandlePaymentWebhookResult) -> Self {
        let message = match result {
            HandlePaymentWebhookResult::InvalidData { reason } => Some(*reason),
            _ => None,
        };
        Self {
            status: result.status(),
            message,
        }
    }
}

/// Error body for rejected webhook deliveries.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// Builds the JSON body for a webhook error.
///
/// Retryable failures use the `status`/`message` shape so PayMongo's
/// delivery log reads the same as for data errors.
pub fn webhook_error_body(err: &WebhookError) -> serde_json::Value {
    if err.is_retryable() {
        serde_json::json!(WebhookResponse {
            status: "error",
            message: Some(err.public_message()),
        })
    } else {
        serde_json::json!(ErrorResponse {
            error: err.public_message(),
        })
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Operational summary of the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayStatusResponse {
    /// `test` or `live`, from the PayMongo key.
    pub mode: &'static str,
    /// URL to register as the PayMongo webhook.
    pub webhook_url: String,
    pub sessions: SessionStats,
    pub recent_sessions: Vec<SessionSummaryResponse>,
}

impl GatewayStatusResponse {
    pub fn new(mode: &'static str, webhook_url: String, result: GetGatewayStatusResult) -> Self {
        Self {
            mode,
            webhook_url,
            sessions: result.stats,
            recent_sessions: result
                .recent
                .iter()
                .map(SessionSummaryResponse::from)
                .collect(),
        }
    }
}

/// One checkout session in the status listing.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryResponse {
    pub session_id: String,
    pub invoice_id: u64,
    pub invoice_number: String,
    pub client_id: u64,
    /// Major units, formatted with two decimals.
    pub amount: String,
    pub status: SessionStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<&CheckoutSession> for SessionSummaryResponse {
    fn from(session: &CheckoutSession) -> Self {
        Self {
            session_id: session.session_id.to_string(),
            invoice_id: session.invoice_id.as_u64(),
            invoice_number: session.invoice_number.clone(),
            client_id: session.client_id.as_u64(),
            amount: format!("{:.2}", session.amount),
            status: session.status,
            created_at: session.created_at.to_rfc3339(),
            completed_at: session.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}
