//! Billing configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Billing configuration (UISP)
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// UISP URL reachable from this service (usually local)
    pub url: String,

    /// UISP URL customers use, for the client zone link
    pub public_url: Option<String>,

    /// Plugin app key sent as `X-Auth-App-Key`
    pub app_key: SecretString,

    /// Accept self-signed certificates on `url`
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl BillingConfig {
    /// Client zone URL shown on the success and cancel pages
    pub fn client_zone_url(&self) -> Option<String> {
        self.public_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| format!("{}/client-zone", u.trim_end_matches('/')))
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("UISP__URL"));
        }
        if self.app_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("UISP__APP_KEY"));
        }
        reqwest::Url::parse(&self.url).map_err(|e| ValidationError::InvalidUrl {
            field: "UISP__URL",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> BillingConfig {
        BillingConfig {
            url: url.to_string(),
            public_url: Some("https://billing.example.com/".to_string()),
            app_key: SecretString::new("app-key".to_string()),
            accept_invalid_certs: false,
        }
    }

    #[test]
    fn test_client_zone_url() {
        assert_eq!(
            config("https://localhost").client_zone_url().as_deref(),
            Some("https://billing.example.com/client-zone")
        );

        let mut without = config("https://localhost");
        without.public_url = None;
        assert_eq!(without.client_zone_url(), None);
    }

    #[test]
    fn test_validate_success() {
        assert!(config("https://localhost").validate().is_ok());
    }

    #[test]
    fn test_validate_missing_url() {
        assert!(matches!(
            config("").validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_validate_bad_url() {
        assert!(matches!(
            config("localhost without scheme").validate(),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_missing_app_key() {
        let mut config = config("https://localhost");
        config.app_key = SecretString::new(String::new());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
