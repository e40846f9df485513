//! PayMongo webhook signature verification.
//!
//! PayMongo signs each delivery with HMAC-SHA256 and sends the result in the
//! `Paymongo-Signature` header:
//!
//! ```text
//! t=<unix timestamp>,te=<test mode signature>,li=<live mode signature>
//! ```
//!
//! The signed payload is `{t}.{raw body}`. Only one of `te`/`li` is
//! populated depending on the mode of the webhook; `li` wins when both are.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature triple.
pub const SIGNATURE_HEADER: &str = "Paymongo-Signature";

/// Parsed components of the `Paymongo-Signature` header.
///
/// Parsing never fails: malformed pairs, unknown keys and empty values are
/// skipped, and absence is checked at verification time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: Option<String>,
    pub test_signature: Option<String>,
    pub live_signature: Option<String>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Self {
        let mut parsed = SignatureHeader::default();

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "t" => parsed.timestamp = Some(value.to_string()),
                "te" => parsed.test_signature = Some(value.to_string()),
                "li" => parsed.live_signature = Some(value.to_string()),
                _ => {}
            }
        }

        parsed
    }

    /// The signature to check: live if present, otherwise test.
    pub fn signature(&self) -> Option<&str> {
        self.live_signature
            .as_deref()
            .or(self.test_signature.as_deref())
    }
}

/// Verifies a webhook body against its signature header.
///
/// Returns false when the header lacks a timestamp or signature, when the
/// signature is not valid hex, or when it does not match.
pub fn verify_signature(raw_body: &[u8], header_value: &str, shared_secret: &str) -> bool {
    if shared_secret.is_empty() {
        return false;
    }

    let header = SignatureHeader::parse(header_value);
    let (Some(timestamp), Some(signature)) = (header.timestamp.as_deref(), header.signature())
    else {
        return false;
    };

    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let expected = compute_signature(shared_secret, timestamp, raw_body);

    constant_time_compare(&expected, &provided)
}

/// Hex-encoded signature PayMongo would send for this payload.
///
/// Used by tests and local tooling to produce valid deliveries.
pub fn sign_payload(shared_secret: &str, timestamp: &str, raw_body: &[u8]) -> String {
    hex::encode(compute_signature(shared_secret, timestamp, raw_body))
}

fn compute_signature(shared_secret: &str, timestamp: &str, raw_body: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(shared_secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Webhook verifier bound to the configured signing secret.
pub struct SignatureVerifier {
    secret: SecretString,
    /// Maximum accepted distance between `t` and now, when set.
    tolerance_secs: Option<i64>,
}

impl SignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            tolerance_secs: None,
        }
    }

    /// Rejects deliveries whose timestamp is further than `secs` from now.
    pub fn with_tolerance(mut self, secs: Option<u64>) -> Self {
        self.tolerance_secs = secs.map(|s| s.min(i64::MAX as u64) as i64);
        self
    }

    pub fn verify(&self, raw_body: &[u8], header_value: &str) -> bool {
        if let Some(tolerance) = self.tolerance_secs {
            if !self.timestamp_within(header_value, tolerance) {
                tracing::warn!(tolerance_secs = tolerance, "Webhook timestamp outside tolerance");
                return false;
            }
        }
        verify_signature(raw_body, header_value, self.secret.expose_secret())
    }

    fn timestamp_within(&self, header_value: &str, tolerance: i64) -> bool {
        let header = SignatureHeader::parse(header_value);
        let Some(ts) = header.timestamp.and_then(|t| t.parse::<i64>().ok()) else {
            return false;
        };
        let age = chrono::Utc::now().timestamp().saturating_sub(ts);
        age.abs() <= tolerance
    }
}
