//! Resolved payment token.
//!
//! UISP issues a single-use token when a customer clicks "pay" on an invoice.
//! Resolving it yields the invoice, client and amount to charge.

use rust_decimal::Decimal;

use crate::domain::foundation::{ClientId, InvoiceId};

/// Field that was absent (or unusable) in a resolved token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingTokenField {
    InvoiceId,
    ClientId,
    Amount,
}

impl MissingTokenField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingTokenField::InvoiceId => "invoiceId",
            MissingTokenField::ClientId => "clientId",
            MissingTokenField::Amount => "amount",
        }
    }
}

/// Invoice/client/amount data behind a payment token.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentToken {
    pub invoice_id: InvoiceId,
    pub client_id: ClientId,
    /// Amount due in major units.
    pub amount: Decimal,
    pub currency: String,
}

impl PaymentToken {
    /// Builds a token from the loosely-typed fields UISP returns.
    ///
    /// Invoice, client and a positive amount are required. An id of 0
    /// counts as missing, since the paid webhook could not attribute it.
    /// A missing currency falls back to `default_currency`.
    pub fn from_parts(
        invoice_id: Option<InvoiceId>,
        client_id: Option<ClientId>,
        amount: Option<Decimal>,
        currency: Option<String>,
        default_currency: &str,
    ) -> Result<Self, MissingTokenField> {
        let invoice_id = invoice_id
            .filter(|id| id.as_u64() > 0)
            .ok_or(MissingTokenField::InvoiceId)?;
        let client_id = client_id
            .filter(|id| id.as_u64() > 0)
            .ok_or(MissingTokenField::ClientId)?;
        let amount = amount
            .filter(|a| a.is_sign_positive() && !a.is_zero())
            .ok_or(MissingTokenField::Amount)?;
        let currency = currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_currency.to_string());

        Ok(Self {
            invoice_id,
            client_id,
            amount,
            currency,
        })
    }
}
