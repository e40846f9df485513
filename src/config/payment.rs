//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (PayMongo)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// PayMongo secret API key (sk_test_... or sk_live_...)
    pub secret_key: SecretString,

    /// Webhook signing secret
    pub webhook_secret: SecretString,

    /// UISP payment method id that PayMongo payments are recorded under
    pub payment_method_id: String,

    /// Accepted payment method types (comma-separated, e.g. `gcash,card`)
    pub payment_method_types: String,

    /// Merchant name shown in checkout descriptions
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,

    /// Currency used when UISP or PayMongo omit one
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Smallest accepted checkout amount in minor units
    #[serde(default = "default_min_amount_minor")]
    pub min_amount_minor: i64,

    /// Reject webhooks whose timestamp is further than this from now
    pub webhook_tolerance_secs: Option<u64>,

    /// PayMongo API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    /// Check if using PayMongo test mode
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using PayMongo live mode
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_live_")
    }

    /// Payment method types as a list, blanks dropped
    pub fn payment_method_types_list(&self) -> Vec<String> {
        self.payment_method_types
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMONGO__SECRET_KEY"));
        }
        if self.webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMONGO__WEBHOOK_SECRET"));
        }
        if self.payment_method_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMONGO__PAYMENT_METHOD_ID"));
        }

        // Verify key prefix for safety
        if !self.secret_key.expose_secret().starts_with("sk_") {
            return Err(ValidationError::InvalidPayMongoKey);
        }
        if self.payment_method_types_list().is_empty() {
            return Err(ValidationError::NoPaymentMethodTypes);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }
        if self.min_amount_minor <= 0 {
            return Err(ValidationError::InvalidMinimumAmount);
        }
        reqwest::Url::parse(&self.api_base_url).map_err(|e| ValidationError::InvalidUrl {
            field: "PAYMONGO__API_BASE_URL",
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

fn default_merchant_name() -> String {
    "Imperial Networks".to_string()
}

fn default_currency() -> String {
    "PHP".to_string()
}

fn default_min_amount_minor() -> i64 {
    100
}

fn default_api_base_url() -> String {
    "https://api.paymongo.com/v1".to_string()
}
