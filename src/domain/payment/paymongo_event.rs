//! PayMongo webhook event types.
//!
//! Only the fields the gateway reads are captured, and every one of them is
//! optional: PayMongo payloads vary by payment method and a missing field is
//! reported by `paid_checkout` rather than failing deserialization.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::foundation::{CheckoutSessionId, ClientId, InvoiceId};

/// Event type sent when a checkout session has been paid.
pub const CHECKOUT_PAID_EVENT: &str = "checkout_session.payment.paid";

/// Payment method recorded when PayMongo does not report a source type.
pub const UNKNOWN_PAYMENT_METHOD: &str = "unknown";

/// PayMongo webhook envelope: `{"data": {"id", "attributes": {...}}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayMongoEvent {
    #[serde(default)]
    pub data: Option<EventResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventResource {
    /// Event id (`evt_...`).
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: Option<EventAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventAttributes {
    /// The resource the event is about; a checkout session for paid events.
    #[serde(default)]
    pub data: Option<CheckoutSessionResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionResource {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: Option<CheckoutSessionAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionAttributes {
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,

    #[serde(default)]
    pub payments: Option<Vec<PaymentResource>>,

    #[serde(default)]
    pub payment_intent: Option<PaymentIntentResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentResource {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: Option<PaymentAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentAttributes {
    /// Minor units.
    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub source: Option<PaymentSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentSource {
    /// `gcash`, `card`, `paymaya`, ...
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentIntentResource {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: Option<PaymentIntentAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentIntentAttributes {
    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// Everything needed to record a paid checkout in UISP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaidCheckout {
    pub session_id: CheckoutSessionId,
    pub invoice_id: InvoiceId,
    pub client_id: ClientId,
    pub invoice_number: Option<String>,
    pub amount_minor: i64,
    pub currency: Option<String>,
    pub payment_method: String,
    pub provider_payment_id: String,
}

/// Why a paid event could not be turned into a `PaidCheckout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaidCheckoutError {
    MissingSessionId,
    MissingMetadata,
    MissingAmount,
}

impl PaidCheckoutError {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaidCheckoutError::MissingSessionId => "Missing session id",
            PaidCheckoutError::MissingMetadata => "Missing metadata",
            PaidCheckoutError::MissingAmount => "Missing amount",
        }
    }
}

impl PayMongoEvent {
    fn attributes(&self) -> Option<&EventAttributes> {
        self.data.as_ref()?.attributes.as_ref()
    }

    /// Event type of a raw payload, empty when absent.
    ///
    /// Read before the typed decode so events of other shapes are ignored
    /// instead of rejected.
    pub fn type_of(payload: &serde_json::Value) -> &str {
        payload
            .pointer("/data/attributes/type")
            .and_then(|t| t.as_str())
            .unwrap_or("")
    }

    pub fn event_id(&self) -> Option<&str> {
        self.data.as_ref()?.id.as_deref()
    }

    /// Raw checkout session metadata, for logging rejected events.
    pub fn metadata(&self) -> Option<&HashMap<String, serde_json::Value>> {
        self.checkout()?.attributes.as_ref()?.metadata.as_ref()
    }

    fn checkout(&self) -> Option<&CheckoutSessionResource> {
        self.attributes()?.data.as_ref()
    }

    /// Extracts the paid checkout.
    ///
    /// Amount, currency, method and payment id come from the first payment
    /// when there is one, otherwise from the payment intent (which carries
    /// no method).
    pub fn paid_checkout(&self) -> Result<PaidCheckout, PaidCheckoutError> {
        let checkout = self.checkout();
        let attributes = checkout.and_then(|c| c.attributes.as_ref());
        let metadata = attributes.and_then(|a| a.metadata.as_ref());

        let invoice_id = metadata_value(metadata, "invoice_id").and_then(|v| v.parse().ok());
        let client_id = metadata_value(metadata, "client_id").and_then(|v| v.parse().ok());
        let (Some(invoice_id), Some(client_id)) = (invoice_id, client_id) else {
            return Err(PaidCheckoutError::MissingMetadata);
        };

        let session_id = checkout
            .and_then(|c| c.id.clone())
            .and_then(|id| CheckoutSessionId::new(id).ok())
            .ok_or(PaidCheckoutError::MissingSessionId)?;

        let invoice_number =
            metadata_value(metadata, "invoice_number").filter(|n| !n.is_empty());

        let first_payment = attributes
            .and_then(|a| a.payments.as_ref())
            .and_then(|p| p.first());

        let (amount, currency, payment_method, provider_payment_id) = match first_payment {
            Some(payment) => {
                let attrs = payment.attributes.as_ref();
                (
                    attrs.and_then(|a| a.amount),
                    attrs.and_then(|a| a.currency.clone()),
                    attrs
                        .and_then(|a| a.source.as_ref())
                        .and_then(|s| s.source_type.clone()),
                    payment.id.clone(),
                )
            }
            None => {
                let intent = attributes.and_then(|a| a.payment_intent.as_ref());
                let attrs = intent.and_then(|i| i.attributes.as_ref());
                (
                    attrs.and_then(|a| a.amount),
                    attrs.and_then(|a| a.currency.clone()),
                    None,
                    intent.and_then(|i| i.id.clone()),
                )
            }
        };

        let amount_minor = amount
            .filter(|a| *a > 0)
            .ok_or(PaidCheckoutError::MissingAmount)?;

        Ok(PaidCheckout {
            session_id,
            invoice_id,
            client_id,
            invoice_number,
            amount_minor,
            currency: currency.map(|c| c.to_uppercase()),
            payment_method: payment_method.unwrap_or_else(|| UNKNOWN_PAYMENT_METHOD.to_string()),
            provider_payment_id: provider_payment_id.unwrap_or_default(),
        })
    }
}

/// Metadata values are strings when we created the session, but accept
/// numbers too.
fn metadata_value(
    metadata: Option<&HashMap<String, serde_json::Value>>,
    key: &str,
) -> Option<String> {
    match metadata?.get(key)? {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paid_event(payments: serde_json::Value, intent: serde_json::Value) -> PayMongoEvent {
        serde_json::from_value(json!({
            "data": {
                "id": "evt_1",
                "type": "event",
                "attributes": {
                    "type": "checkout_session.payment.paid",
                    "livemode": false,
                    "data": {
                        "id": "cs_test_abc",
                        "type": "checkout_session",
                        "attributes": {
                            "metadata": {
                                "invoice_id": "42",
                                "client_id": "7",
                                "amount": "799.00",
                                "invoice_number": "2024-0042"
                            },
                            "payments": payments,
                            "payment_intent": intent
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn extracts_from_first_payment() {
        let event = paid_event(
            json!([{
                "id": "pay_1",
                "attributes": {"amount": 79900, "currency": "PHP", "source": {"type": "gcash"}}
            }]),
            json!(null),
        );

        assert_eq!(event.event_id(), Some("evt_1"));

        let paid = event.paid_checkout().unwrap();
        assert_eq!(paid.session_id.as_str(), "cs_test_abc");
        assert_eq!(paid.invoice_id, InvoiceId::new(42));
        assert_eq!(paid.client_id, ClientId::new(7));
        assert_eq!(paid.invoice_number.as_deref(), Some("2024-0042"));
        assert_eq!(paid.amount_minor, 79900);
        assert_eq!(paid.currency.as_deref(), Some("PHP"));
        assert_eq!(paid.payment_method, "gcash");
        assert_eq!(paid.provider_payment_id, "pay_1");
    }

    #[test]
    fn falls_back_to_payment_intent() {
        let event = paid_event(
            json!([]),
            json!({"id": "pi_1", "attributes": {"amount": 50000}}),
        );

        let paid = event.paid_checkout().unwrap();
        assert_eq!(paid.amount_minor, 50000);
        assert_eq!(paid.payment_method, UNKNOWN_PAYMENT_METHOD);
        assert_eq!(paid.provider_payment_id, "pi_1");
        assert_eq!(paid.currency, None);
    }

    #[test]
    fn no_amount_anywhere_is_an_error() {
        let event = paid_event(json!(null), json!(null));
        assert_eq!(event.paid_checkout(), Err(PaidCheckoutError::MissingAmount));
    }

    #[test]
    fn numeric_metadata_is_accepted() {
        let event: PayMongoEvent = serde_json::from_value(json!({
            "data": {"attributes": {
                "type": "checkout_session.payment.paid",
                "data": {"id": "cs_1", "attributes": {
                    "metadata": {"invoice_id": 42, "client_id": 7},
                    "payments": [{"id": "pay_1", "attributes": {"amount": 100}}]
                }}
            }}
        }))
        .unwrap();

        let paid = event.paid_checkout().unwrap();
        assert_eq!(paid.invoice_id, InvoiceId::new(42));
        assert_eq!(paid.invoice_number, None);
    }

    #[test]
    fn missing_or_garbage_metadata_is_an_error() {
        let event: PayMongoEvent = serde_json::from_value(json!({
            "data": {"attributes": {
                "type": "checkout_session.payment.paid",
                "data": {"id": "cs_1", "attributes": {
                    "metadata": {"invoice_id": "abc", "client_id": "7"}
                }}
            }}
        }))
        .unwrap();
        assert_eq!(event.paid_checkout(), Err(PaidCheckoutError::MissingMetadata));

        let empty = PayMongoEvent::default();
        assert_eq!(empty.paid_checkout(), Err(PaidCheckoutError::MissingMetadata));
    }

    #[test]
    fn missing_session_id_is_an_error() {
        let event: PayMongoEvent = serde_json::from_value(json!({
            "data": {"attributes": {
                "type": "checkout_session.payment.paid",
                "data": {"attributes": {
                    "metadata": {"invoice_id": "1", "client_id": "2"},
                    "payments": [{"attributes": {"amount": 100}}]
                }}
            }}
        }))
        .unwrap();
        assert_eq!(event.paid_checkout(), Err(PaidCheckoutError::MissingSessionId));
    }

    #[test]
    fn type_is_read_from_raw_payload() {
        let failed = json!({"data": {"attributes": {"type": "payment.failed"}}});
        assert_eq!(PayMongoEvent::type_of(&failed), "payment.failed");

        // Shapes the typed decode would reject still report their type
        let odd = json!({"data": {"attributes": {"type": "source.chargeable", "data": 5}}});
        assert_eq!(PayMongoEvent::type_of(&odd), "source.chargeable");

        assert_eq!(PayMongoEvent::type_of(&json!({})), "");
        assert_eq!(PayMongoEvent::type_of(&json!({"data": {"attributes": {"type": 1}}})), "");
    }
}
