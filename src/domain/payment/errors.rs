//! Payment error taxonomy.
//!
//! | Error | Raised by | Surface |
//! |-------|-----------|---------|
//! | GatewayError | PayMongo client | generic retry page |
//! | BillingError | UISP client | generic page / webhook 500 |
//! | StoreError | session store | generic page / logged |
//! | InitiatePaymentError | payment initiation | user-facing page (500) |

use thiserror::Error;

/// Failure talking to PayMongo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("PayMongo API connection error: {0}")]
    Transport(String),

    #[error("PayMongo API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    #[error("PayMongo API returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// HTTP status returned by PayMongo, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure talking to the UISP billing API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("UISP API connection error: {0}")]
    Transport(String),

    #[error("UISP API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    #[error("UISP API returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl BillingError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BillingError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure reading or writing checkout sessions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session store IO error: {0}")]
    Io(String),

    #[error("Session store is corrupted: {0}")]
    Corrupted(String),

    #[error("Session {session_id} already exists with a different amount")]
    Conflict { session_id: String },

    #[error("Invalid status change for session {session_id}: {reason}")]
    InvalidTransition { session_id: String, reason: String },
}

/// Reasons a payment initiation request is refused.
#[derive(Debug, Error)]
pub enum InitiatePaymentError {
    #[error("Payment request is missing its token")]
    InvalidRequest,

    #[error("Payment token could not be resolved: {0}")]
    Token(#[source] BillingError),

    #[error("Payment token data is missing {0}")]
    InvalidPaymentData(&'static str),

    #[error("Amount of {amount_minor} minor units is below the minimum of {minimum_minor}")]
    AmountTooSmall { amount_minor: i64, minimum_minor: i64 },

    #[error("Checkout session could not be created: {0}")]
    Gateway(#[source] GatewayError),

    #[error("Checkout session could not be stored: {0}")]
    Storage(#[source] StoreError),
}

impl InitiatePaymentError {
    /// Message safe to show the customer.
    pub fn user_message(&self) -> &'static str {
        match self {
            InitiatePaymentError::InvalidRequest => {
                "Invalid payment request. Please try again from your invoice."
            }
            InitiatePaymentError::Token(_) => {
                "Invalid or expired payment link. Please try again from your invoice."
            }
            InitiatePaymentError::InvalidPaymentData(_) => {
                "Invalid payment data. Please try again from your invoice."
            }
            InitiatePaymentError::AmountTooSmall { .. } => "Payment amount is too small.",
            InitiatePaymentError::Gateway(GatewayError::InvalidResponse(_)) => {
                "Payment service returned an invalid response. Please try again."
            }
            InitiatePaymentError::Gateway(_) => {
                "Could not create payment session. Please try again later."
            }
            InitiatePaymentError::Storage(_) => {
                "An unexpected error occurred. Please try again or contact support."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_status_error_carries_status_and_body() {
        let err = GatewayError::Status {
            status: 422,
            body: "{\"errors\":[]}".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("HTTP 422"));
        assert!(err.to_string().contains("errors"));
    }

    #[test]
    fn transport_errors_have_no_status() {
        assert_eq!(GatewayError::Transport("timeout".into()).status(), None);
        assert_eq!(BillingError::Transport("refused".into()).status(), None);
    }

    #[test]
    fn user_messages_never_leak_details() {
        let err = InitiatePaymentError::Token(BillingError::Status {
            status: 404,
            body: "token abcdef123 not found".to_string(),
        });
        assert!(!err.user_message().contains("abcdef123"));
        assert!(err.user_message().contains("expired"));
    }

    #[test]
    fn invalid_gateway_response_has_its_own_message() {
        let invalid = InitiatePaymentError::Gateway(GatewayError::InvalidResponse("x".into()));
        let down = InitiatePaymentError::Gateway(GatewayError::Transport("x".into()));
        assert_ne!(invalid.user_message(), down.user_message());
    }
}
