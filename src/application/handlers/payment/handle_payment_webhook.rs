//! HandlePaymentWebhookHandler - Command handler for PayMongo webhooks.
//!
//! Verifies the delivery, filters for paid checkout events, and records the
//! payment in UISP exactly once per checkout session.
//!
//! Responses drive PayMongo's retries: data problems are acknowledged with
//! 200 so they are not redelivered, while a failed UISP write is answered
//! with 500 so the delivery is retried.

use std::sync::Arc;

use axum::http::Method;
use chrono::Utc;

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::{
    from_minor_units, CheckoutSession, PaidCheckout, PayMongoEvent, SessionStatus,
    SignatureVerifier, WebhookError, CHECKOUT_PAID_EVENT,
};
use crate::ports::{
    BillingSystem, NewPayment, RecordingClaim, SessionStore, StatusUpdate, RECORDING_LEASE_SECS,
};

/// Provider name recorded on UISP payments.
pub const PROVIDER_NAME: &str = "PayMongo";

/// Command to handle a webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// HTTP method of the delivery.
    pub method: Method,
    /// Raw webhook payload.
    pub payload: Vec<u8>,
    /// `Paymongo-Signature` header, empty when absent.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Payment recorded in UISP.
    Recorded {
        session_id: CheckoutSessionId,
        uisp_payment_id: Option<u64>,
    },
    /// Not a paid checkout event.
    Ignored { event_type: String },
    /// Session already completed by an earlier delivery.
    AlreadyProcessed { session_id: CheckoutSessionId },
    /// Another delivery is recording this session right now.
    InProgress { session_id: CheckoutSessionId },
    /// Paid event without usable metadata or amount. Acknowledged, not retried.
    InvalidData { reason: &'static str },
}

impl HandlePaymentWebhookResult {
    /// Value of the `status` field in the response body.
    pub fn status(&self) -> &'static str {
        match self {
            HandlePaymentWebhookResult::Recorded { .. } => "success",
            HandlePaymentWebhookResult::Ignored { .. } => "ignored",
            HandlePaymentWebhookResult::AlreadyProcessed { .. }
            | HandlePaymentWebhookResult::InProgress { .. } => "already_processed",
            HandlePaymentWebhookResult::InvalidData { .. } => "error",
        }
    }
}

/// Settings for recording payments.
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    /// UISP payment method id payments are recorded under.
    pub payment_method_id: String,

    /// Used when the payment carries no currency.
    pub default_currency: String,
}

/// Handler for PayMongo webhooks.
pub struct HandlePaymentWebhookHandler {
    verifier: Arc<SignatureVerifier>,
    session_store: Arc<dyn SessionStore>,
    billing: Arc<dyn BillingSystem>,
    settings: WebhookSettings,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: Arc<SignatureVerifier>,
        session_store: Arc<dyn SessionStore>,
        billing: Arc<dyn BillingSystem>,
        settings: WebhookSettings,
    ) -> Self {
        Self {
            verifier,
            session_store,
            billing,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Authenticate the delivery
        if cmd.method != Method::POST {
            return Err(WebhookError::MethodNotAllowed);
        }
        if cmd.payload.is_empty() || cmd.signature.trim().is_empty() {
            tracing::warn!("Webhook received with empty body or signature");
            return Err(WebhookError::MissingBodyOrSignature);
        }
        if !self.verifier.verify(&cmd.payload, &cmd.signature) {
            tracing::warn!("Webhook signature verification failed");
            return Err(WebhookError::InvalidSignature);
        }

        // 2. Parse and filter
        let payload: serde_json::Value = serde_json::from_slice(&cmd.payload).map_err(|e| {
            tracing::error!(error = %e, "Webhook payload is not valid JSON");
            WebhookError::InvalidJson(e.to_string())
        })?;
        if !payload.is_object() {
            tracing::error!("Webhook payload is not a JSON object");
            return Err(WebhookError::InvalidJson("expected an object".to_string()));
        }

        let event_type = PayMongoEvent::type_of(&payload).to_string();
        tracing::info!(event_type = %event_type, "Webhook received");

        if event_type != CHECKOUT_PAID_EVENT {
            tracing::info!(event_type = %event_type, "Ignoring non-payment webhook event");
            return Ok(HandlePaymentWebhookResult::Ignored { event_type });
        }

        let event: PayMongoEvent = match serde_json::from_value(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = %e, "Paid checkout event has an unexpected shape");
                return Ok(HandlePaymentWebhookResult::InvalidData {
                    reason: "Malformed checkout data",
                });
            }
        };

        let paid = match event.paid_checkout() {
            Ok(paid) => paid,
            Err(e) => {
                // Payment taken at PayMongo but not attributable; needs an operator.
                tracing::error!(
                    event_id = ?event.event_id(),
                    reason = e.as_str(),
                    metadata = ?event.metadata(),
                    "Paid checkout event cannot be recorded"
                );
                return Ok(HandlePaymentWebhookResult::InvalidData { reason: e.as_str() });
            }
        };

        // 3. Idempotency. The claim is taken under the store lock, so of two
        // concurrent deliveries only one reaches UISP.
        let candidate = CheckoutSession::from_paid_checkout(&paid);
        let claimed = match self.session_store.begin_recording(&candidate).await {
            Ok(RecordingClaim::AlreadyCompleted) => {
                tracing::info!(session_id = %paid.session_id, "Duplicate webhook for already-completed session");
                return Ok(HandlePaymentWebhookResult::AlreadyProcessed {
                    session_id: paid.session_id,
                });
            }
            Ok(RecordingClaim::InProgress) => {
                tracing::info!(session_id = %paid.session_id, "Duplicate webhook while payment is being recorded");
                return Ok(HandlePaymentWebhookResult::InProgress {
                    session_id: paid.session_id,
                });
            }
            Ok(RecordingClaim::Adopted) => {
                tracing::warn!(session_id = %paid.session_id, "Paid event for a session this gateway does not know");
                true
            }
            Ok(RecordingClaim::Claimed) => true,
            Err(e) => {
                // Only a failed UISP write may ask for a redelivery.
                tracing::error!(
                    session_id = %paid.session_id,
                    error = %e,
                    "Cannot claim session in store, recording without duplicate check"
                );
                false
            }
        };

        // 4. Record in UISP
        self.record_payment(paid, claimed).await
    }

    async fn record_payment(
        &self,
        paid: PaidCheckout,
        claimed: bool,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let amount = from_minor_units(paid.amount_minor);
        let payment = NewPayment {
            client_id: paid.client_id,
            amount,
            method_id: self.settings.payment_method_id.clone(),
            currency_code: paid
                .currency
                .clone()
                .unwrap_or_else(|| self.settings.default_currency.clone()),
            created_date: Utc::now(),
            note: format!("{} - {}", PROVIDER_NAME, paid.payment_method),
            provider_name: PROVIDER_NAME.to_string(),
            provider_payment_id: paid.provider_payment_id.clone(),
            invoice_ids: vec![paid.invoice_id],
        };

        tracing::info!(
            invoice_id = %paid.invoice_id,
            client_id = %paid.client_id,
            amount = %amount,
            payment_method = %paid.payment_method,
            provider_payment_id = %paid.provider_payment_id,
            "Recording payment in UISP"
        );

        let recorded = match self.billing.create_payment(&payment).await {
            Ok(recorded) => recorded,
            Err(e) => {
                tracing::error!(invoice_id = %paid.invoice_id, error = %e, "Failed to create payment in UISP");
                if claimed {
                    self.release_claim(&paid.session_id).await;
                }
                return Err(WebhookError::Billing(e));
            }
        };

        // 5. Mark completed. The payment exists in UISP now, so a failure here
        // must not trigger a redelivery.
        match self
            .session_store
            .update_status(&paid.session_id, SessionStatus::Completed)
            .await
        {
            Ok(StatusUpdate::NotFound) => {
                tracing::warn!(session_id = %paid.session_id, "Recorded payment for untracked session");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    session_id = %paid.session_id,
                    error = %e,
                    "Payment recorded but session could not be marked completed"
                );
            }
        }

        tracing::info!(
            invoice_id = %paid.invoice_id,
            uisp_payment_id = ?recorded.id,
            amount = %amount,
            "Payment recorded successfully"
        );

        Ok(HandlePaymentWebhookResult::Recorded {
            session_id: paid.session_id,
            uisp_payment_id: recorded.id,
        })
    }

    /// Lets the redelivery record the payment. A claim that cannot be
    /// released lapses after the recording lease.
    async fn release_claim(&self, session_id: &CheckoutSessionId) {
        if let Err(e) = self.session_store.release_recording(session_id).await {
            tracing::error!(
                session_id = %session_id,
                error = %e,
                lease_secs = RECORDING_LEASE_SECS,
                "Cannot release recording claim, redeliveries wait for the lease to lapse"
            );
        }
    }
}
