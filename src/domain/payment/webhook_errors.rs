//! Webhook error types for PayMongo webhook handling.
//!
//! Status codes determine PayMongo's retry behavior:
//! - 2xx: delivery acknowledged, no retry
//! - 4xx: rejected, retrying will not help
//! - 5xx: transient failure, PayMongo retries the delivery

use axum::http::StatusCode;
use thiserror::Error;

use super::errors::BillingError;

/// Errors that end webhook processing without a 200 response.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing body or signature")]
    MissingBodyOrSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// UISP rejected or never received the payment write.
    #[error("Failed to record payment: {0}")]
    Billing(#[source] BillingError),
}

impl WebhookError {
    /// Returns true if PayMongo should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Billing(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::MissingBodyOrSignature | WebhookError::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::Billing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message returned to PayMongo.
    pub fn public_message(&self) -> &'static str {
        match self {
            WebhookError::MethodNotAllowed => "Method not allowed",
            WebhookError::MissingBodyOrSignature => "Missing body or signature",
            WebhookError::InvalidSignature => "Invalid signature",
            WebhookError::InvalidJson(_) => "Invalid JSON",
            WebhookError::Billing(_) => "Failed to record payment",
        }
    }
}
