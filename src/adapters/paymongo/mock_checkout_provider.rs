//! Mock checkout provider for testing.
//!
//! Returns a configurable checkout session, can be told to fail, and records
//! every create request for assertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::GatewayError;
use crate::ports::{
    CheckoutProvider, CheckoutSessionDetails, CreateCheckoutRequest, CreatedCheckout,
};

/// Mock checkout provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockCheckoutProvider::new();
/// mock.set_error(GatewayError::Transport("down".into()));
/// ```
#[derive(Clone, Default)]
pub struct MockCheckoutProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Session returned on the next create; generated when unset.
    next_checkout: Option<CreatedCheckout>,

    /// Error to return on every call while set.
    error: Option<GatewayError>,

    requests: Vec<CreateCheckoutRequest>,
}

impl MockCheckoutProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that fails every call with `error`.
    pub fn failing(error: GatewayError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    pub fn set_checkout(&self, checkout: CreatedCheckout) {
        self.inner.lock().unwrap().next_checkout = Some(checkout);
    }

    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().error = Some(error);
    }

    /// Create requests received so far.
    pub fn requests(&self) -> Vec<CreateCheckoutRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl CheckoutProvider for MockCheckoutProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CreatedCheckout, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request);

        if let Some(error) = state.error.clone() {
            return Err(error);
        }

        let n = state.requests.len();
        Ok(state.next_checkout.clone().unwrap_or_else(|| {
            let id = format!("cs_mock_{}", n);
            CreatedCheckout {
                checkout_url: format!("https://checkout.paymongo.com/{}", id),
                session_id: CheckoutSessionId::new(id).unwrap(),
            }
        }))
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<CheckoutSessionDetails, GatewayError> {
        if let Some(error) = self.inner.lock().unwrap().error.clone() {
            return Err(error);
        }

        Ok(CheckoutSessionDetails {
            session_id: session_id.clone(),
            status: Some("active".to_string()),
            checkout_url: Some(format!("https://checkout.paymongo.com/{}", session_id)),
            payment_ids: vec![],
        })
    }
}
