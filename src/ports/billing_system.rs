//! Billing system port for the UISP (UCRM) API.
//!
//! Covers the three calls the gateway needs: resolving the payment token
//! UISP attaches to the "pay online" link, reading an invoice for its
//! number, and recording a payment against an invoice.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::foundation::{ClientId, InvoiceId};
use crate::domain::payment::BillingError;

/// Port for billing system integrations.
#[async_trait]
pub trait BillingSystem: Send + Sync {
    /// Resolve a payment token into its invoice, client and amount.
    ///
    /// Fields are optional because UISP may omit them; the caller decides
    /// which are required.
    async fn resolve_payment_token(&self, token: &str)
        -> Result<ResolvedPaymentToken, BillingError>;

    /// Fetch an invoice.
    async fn get_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, BillingError>;

    /// Record a payment and apply it to the listed invoices.
    async fn create_payment(&self, payment: &NewPayment) -> Result<RecordedPayment, BillingError>;
}

/// Payment token as returned by UISP.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPaymentToken {
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,

    #[serde(default)]
    pub client_id: Option<ClientId>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// The invoice fields the gateway reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: Option<InvoiceId>,

    #[serde(default)]
    pub number: Option<String>,
}

/// Payment to record in UISP.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub client_id: ClientId,

    /// Major units, sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// UISP payment method id configured for PayMongo.
    pub method_id: String,

    pub currency_code: String,

    #[serde(serialize_with = "serialize_created_date")]
    pub created_date: DateTime<Utc>,

    pub note: String,
    pub provider_name: String,
    pub provider_payment_id: String,
    pub invoice_ids: Vec<InvoiceId>,
}

/// UISP expects ISO 8601 with an explicit offset, e.g. `2024-01-15T10:30:00+00:00`.
fn serialize_created_date<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// Payment created in UISP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordedPayment {
    /// UISP payment id; absent when UISP answers with an empty body.
    #[serde(default)]
    pub id: Option<u64>,
}
