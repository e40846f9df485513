//! Strongly-typed identifier value objects.
//!
//! Invoice and client identifiers are issued by UISP as positive integers.
//! Checkout session identifiers are opaque strings issued by PayMongo.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// UISP invoice identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(u64);

impl InvoiceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvoiceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_numeric_id("invoice_id", s).map(Self)
    }
}

/// UISP client identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u64);

impl ClientId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_numeric_id("client_id", s).map(Self)
    }
}

/// PayMongo checkout session identifier (`cs_...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutSessionId(String);

impl CheckoutSessionId {
    /// Creates a session id, rejecting empty or whitespace-only values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckoutSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CheckoutSessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn parse_numeric_id(field: &'static str, raw: &str) -> Result<u64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    match raw.parse::<u64>() {
        Ok(0) => Err(ValidationError::invalid_format(field, "must be positive")),
        Ok(id) => Ok(id),
        Err(_) => Err(ValidationError::invalid_format(field, "not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_id_parses_from_metadata_string() {
        let id: InvoiceId = "1042".parse().unwrap();
        assert_eq!(id.as_u64(), 1042);
        assert_eq!(id.to_string(), "1042");
    }

    #[test]
    fn invoice_id_rejects_garbage() {
        assert!("abc".parse::<InvoiceId>().is_err());
        assert!("".parse::<InvoiceId>().is_err());
        assert!("0".parse::<InvoiceId>().is_err());
        assert!("-5".parse::<InvoiceId>().is_err());
    }

    #[test]
    fn client_id_trims_whitespace() {
        let id: ClientId = " 77 ".parse().unwrap();
        assert_eq!(id, ClientId::new(77));
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&InvoiceId::new(5)).unwrap();
        assert_eq!(json, "5");

        let session = CheckoutSessionId::new("cs_abc").unwrap();
        assert_eq!(serde_json::to_string(&session).unwrap(), "\"cs_abc\"");
    }

    #[test]
    fn checkout_session_id_rejects_blank() {
        assert!(CheckoutSessionId::new("").is_err());
        assert!(CheckoutSessionId::new("   ").is_err());
    }
}
