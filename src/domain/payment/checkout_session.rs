//! Checkout session record.
//!
//! One record per PayMongo checkout session, created as `Pending` when the
//! customer is redirected to PayMongo and moved to `Completed` exactly once
//! when the paid webhook has been recorded in UISP.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CheckoutSessionId, ClientId, InvoiceId, StateMachine, Timestamp, ValidationError,
};

use super::money::from_minor_units;
use super::payment_token::PaymentToken;
use super::paymongo_event::PaidCheckout;

/// Lifecycle status of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Customer was sent to checkout; no payment recorded yet.
    Pending,

    /// Payment recorded in UISP. Terminal.
    Completed,
}

impl StateMachine for SessionStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            SessionStatus::Pending => &[SessionStatus::Completed],
            SessionStatus::Completed => &[],
        }
    }
}

/// Persisted checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: CheckoutSessionId,
    pub invoice_id: InvoiceId,
    pub client_id: ClientId,
    /// Amount in major units, as resolved from the payment token.
    pub amount: Decimal,
    /// Amount sent to PayMongo, in minor units.
    pub amount_minor: i64,
    pub invoice_number: String,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    /// Set while a webhook delivery is recording the payment in UISP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_since: Option<Timestamp>,
}

impl CheckoutSession {
    /// Creates a new pending session for a freshly created checkout.
    pub fn pending(
        session_id: CheckoutSessionId,
        token: &PaymentToken,
        amount_minor: i64,
        invoice_number: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            invoice_id: token.invoice_id,
            client_id: token.client_id,
            amount: token.amount,
            amount_minor,
            invoice_number: invoice_number.into(),
            status: SessionStatus::Pending,
            created_at: Timestamp::now(),
            completed_at: None,
            recording_since: None,
        }
    }

    /// Rebuilds a pending record from a paid event whose session was never
    /// stored here, so redeliveries can still be recognised.
    pub fn from_paid_checkout(paid: &PaidCheckout) -> Self {
        Self {
            session_id: paid.session_id.clone(),
            invoice_id: paid.invoice_id,
            client_id: paid.client_id,
            amount: from_minor_units(paid.amount_minor),
            amount_minor: paid.amount_minor,
            invoice_number: paid
                .invoice_number
                .clone()
                .unwrap_or_else(|| format!("INV-{}", paid.invoice_id)),
            status: SessionStatus::Pending,
            created_at: Timestamp::now(),
            completed_at: None,
            recording_since: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// True while a recording claim taken less than `lease_secs` ago is held.
    pub fn is_being_recorded(&self, now: Timestamp, lease_secs: i64) -> bool {
        self.recording_since
            .map_or(false, |since| now.secs_since(&since) < lease_secs)
    }

    /// Moves the session to `target`.
    ///
    /// Returns `Ok(false)` when the session is already in `target`, so
    /// repeated completion is a no-op rather than an error. Any other
    /// transition outside `Pending → Completed` is rejected.
    pub fn apply_status(
        &mut self,
        target: SessionStatus,
        at: Timestamp,
    ) -> Result<bool, ValidationError> {
        if self.status == target {
            return Ok(false);
        }
        self.status = self.status.transition_to(target)?;
        if target == SessionStatus::Completed {
            self.completed_at = Some(at);
            self.recording_since = None;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> PaymentToken {
        PaymentToken {
            invoice_id: InvoiceId::new(10),
            client_id: ClientId::new(20),
            amount: Decimal::new(79900, 2),
            currency: "PHP".to_string(),
        }
    }

    fn session() -> CheckoutSession {
        CheckoutSession::pending(
            CheckoutSessionId::new("cs_test_1").unwrap(),
            &token(),
            79900,
            "2024-0001",
        )
    }

    #[test]
    fn pending_copies_token_fields() {
        let s = session();
        assert_eq!(s.invoice_id, InvoiceId::new(10));
        assert_eq!(s.client_id, ClientId::new(20));
        assert_eq!(s.amount_minor, 79900);
        assert_eq!(s.status, SessionStatus::Pending);
        assert!(s.completed_at.is_none());
    }

    #[test]
    fn completing_sets_completed_at() {
        let mut s = session();
        let at = Timestamp::now();

        assert_eq!(s.apply_status(SessionStatus::Completed, at), Ok(true));
        assert!(s.is_completed());
        assert_eq!(s.completed_at, Some(at));
    }

    #[test]
    fn completing_twice_is_a_noop() {
        let mut s = session();
        let first = Timestamp::now();
        s.apply_status(SessionStatus::Completed, first).unwrap();

        assert_eq!(s.apply_status(SessionStatus::Completed, Timestamp::now()), Ok(false));
        assert_eq!(s.completed_at, Some(first));
    }

    #[test]
    fn completed_cannot_go_back_to_pending() {
        let mut s = session();
        s.apply_status(SessionStatus::Completed, Timestamp::now()).unwrap();

        assert!(s.apply_status(SessionStatus::Pending, Timestamp::now()).is_err());
        assert!(s.is_completed());
    }

    #[test]
    fn completed_is_terminal() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(!SessionStatus::Pending.is_terminal());
    }

    #[test]
    fn pending_record_serializes_without_completed_at() {
        let json = serde_json::to_value(session()).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["session_id"], "cs_test_1");
        assert_eq!(json["amount_minor"], 79900);
        assert!(json.get("completed_at").is_none());
    }

    fn at(rfc3339: &str) -> Timestamp {
        serde_json::from_value(serde_json::Value::String(rfc3339.to_string())).unwrap()
    }

    #[test]
    fn recording_claim_expires_after_lease() {
        let mut s = session();
        assert!(!s.is_being_recorded(at("2024-01-15T10:30:00Z"), 120));

        s.recording_since = Some(at("2024-01-15T10:30:00Z"));
        assert!(s.is_being_recorded(at("2024-01-15T10:31:59Z"), 120));
        assert!(!s.is_being_recorded(at("2024-01-15T10:32:00Z"), 120));
    }

    #[test]
    fn completing_clears_recording_claim() {
        let mut s = session();
        s.recording_since = Some(Timestamp::now());

        s.apply_status(SessionStatus::Completed, Timestamp::now()).unwrap();
        assert!(s.recording_since.is_none());
        assert!(serde_json::to_value(&s).unwrap().get("recording_since").is_none());
    }

    #[test]
    fn paid_checkout_becomes_pending_record() {
        let paid = PaidCheckout {
            session_id: CheckoutSessionId::new("cs_unknown").unwrap(),
            invoice_id: InvoiceId::new(42),
            client_id: ClientId::new(7),
            invoice_number: None,
            amount_minor: 79900,
            currency: Some("PHP".to_string()),
            payment_method: "gcash".to_string(),
            provider_payment_id: "pay_1".to_string(),
        };

        let s = CheckoutSession::from_paid_checkout(&paid);

        assert_eq!(s.session_id.as_str(), "cs_unknown");
        assert_eq!(s.amount, Decimal::new(79900, 2));
        assert_eq!(s.invoice_number, "INV-42");
        assert_eq!(s.status, SessionStatus::Pending);
        assert!(s.recording_since.is_none());
    }
}
