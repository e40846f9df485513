//! Checkout provider port for hosted payment pages.
//!
//! Defines the contract for creating and inspecting hosted checkout
//! sessions. PayMongo is the only implementation; the mock adapter backs
//! the handler tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::GatewayError;

/// Port for checkout provider integrations.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a hosted checkout session with a single line item.
    ///
    /// Returns the provider's session id and the URL the customer is sent to.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CreatedCheckout, GatewayError>;

    /// Fetch the current state of a checkout session.
    async fn retrieve_checkout_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<CheckoutSessionDetails, GatewayError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Line item amount in minor units.
    pub amount_minor: i64,

    /// ISO currency code, e.g. `PHP`.
    pub currency: String,

    /// Used as both the line item name and the session description.
    pub description: String,

    /// Accepted payment method types (`gcash`, `card`, ...).
    pub payment_method_types: Vec<String>,

    pub success_url: String,
    pub cancel_url: String,

    /// Opaque metadata echoed back in webhook events.
    pub metadata: BTreeMap<String, String>,
}

/// Newly created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCheckout {
    pub session_id: CheckoutSessionId,
    pub checkout_url: String,
}

/// Checkout session as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionDetails {
    pub session_id: CheckoutSessionId,

    /// Provider status (`active`, `expired`, ...).
    pub status: Option<String>,

    pub checkout_url: Option<String>,

    /// Ids of payments made through this session.
    pub payment_ids: Vec<String>,
}

impl CheckoutSessionDetails {
    pub fn is_paid(&self) -> bool {
        !self.payment_ids.is_empty()
    }
}
