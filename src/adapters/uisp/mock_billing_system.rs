//! Mock billing system for testing.
//!
//! Serves a configurable payment token and invoice, records created
//! payments, and supports per-method error injection.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::InvoiceId;
use crate::domain::payment::BillingError;
use crate::ports::{BillingSystem, Invoice, NewPayment, RecordedPayment, ResolvedPaymentToken};

/// Mock billing system.
#[derive(Clone, Default)]
pub struct MockBillingSystem {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    token: ResolvedPaymentToken,
    invoice: Invoice,
    token_error: Option<BillingError>,
    invoice_error: Option<BillingError>,
    payment_error: Option<BillingError>,
    token_lookups: Vec<String>,
    payments: Vec<NewPayment>,
}

impl MockBillingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: ResolvedPaymentToken) {
        self.inner.lock().unwrap().token = token;
    }

    pub fn set_invoice(&self, invoice: Invoice) {
        self.inner.lock().unwrap().invoice = invoice;
    }

    pub fn fail_token_lookup(&self, error: BillingError) {
        self.inner.lock().unwrap().token_error = Some(error);
    }

    pub fn fail_invoice_lookup(&self, error: BillingError) {
        self.inner.lock().unwrap().invoice_error = Some(error);
    }

    /// Fail `create_payment` until `clear_payment_error` is called.
    pub fn fail_payments(&self, error: BillingError) {
        self.inner.lock().unwrap().payment_error = Some(error);
    }

    pub fn clear_payment_error(&self) {
        self.inner.lock().unwrap().payment_error = None;
    }

    /// Payments recorded so far.
    pub fn payments(&self) -> Vec<NewPayment> {
        self.inner.lock().unwrap().payments.clone()
    }

    pub fn token_lookups(&self) -> Vec<String> {
        self.inner.lock().unwrap().token_lookups.clone()
    }
}

#[async_trait]
impl BillingSystem for MockBillingSystem {
    async fn resolve_payment_token(
        &self,
        token: &str,
    ) -> Result<ResolvedPaymentToken, BillingError> {
        let mut state = self.inner.lock().unwrap();
        state.token_lookups.push(token.to_string());
        match &state.token_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.token.clone()),
        }
    }

    async fn get_invoice(&self, _invoice_id: InvoiceId) -> Result<Invoice, BillingError> {
        let state = self.inner.lock().unwrap();
        match &state.invoice_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.invoice.clone()),
        }
    }

    async fn create_payment(&self, payment: &NewPayment) -> Result<RecordedPayment, BillingError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(error) = &state.payment_error {
            return Err(error.clone());
        }
        state.payments.push(payment.clone());
        Ok(RecordedPayment {
            id: Some(state.payments.len() as u64),
        })
    }
}
