//! Gateway configuration

use std::path::PathBuf;

use reqwest::Url;
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::ports::DEFAULT_MAX_SESSIONS;

/// Gateway configuration (public URL and session storage)
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Public URL of this service; PayMongo redirects and webhooks target it
    pub public_url: String,

    /// JSON file holding checkout sessions
    #[serde(default = "default_sessions_file")]
    pub sessions_file: PathBuf,

    /// Sessions kept before the oldest are evicted, at most 1000
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl GatewayConfig {
    /// Parsed public URL
    pub fn public_url(&self) -> Result<Url, ValidationError> {
        Url::parse(self.public_url.trim()).map_err(|e| ValidationError::InvalidUrl {
            field: "GATEWAY__PUBLIC_URL",
            reason: e.to_string(),
        })
    }

    /// URL to register as the PayMongo webhook endpoint
    pub fn webhook_url(&self) -> Result<Url, ValidationError> {
        let mut url = self.public_url()?;
        url.query_pairs_mut().append_pair("action", "webhook");
        Ok(url)
    }

    /// Validate gateway configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.public_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__PUBLIC_URL"));
        }
        let url = self.public_url()?;
        if *environment == Environment::Production && url.scheme() != "https" {
            return Err(ValidationError::PublicUrlMustBeHttps);
        }
        if self.max_sessions == 0 || self.max_sessions > DEFAULT_MAX_SESSIONS {
            return Err(ValidationError::InvalidMaxSessions {
                value: self.max_sessions,
                max: DEFAULT_MAX_SESSIONS,
            });
        }
        Ok(())
    }
}

fn default_sessions_file() -> PathBuf {
    PathBuf::from("data/paymongo_sessions.json")
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(public_url: &str) -> GatewayConfig {
        GatewayConfig {
            public_url: public_url.to_string(),
            sessions_file: default_sessions_file(),
            max_sessions: default_max_sessions(),
        }
    }

    #[test]
    fn test_webhook_url() {
        let url = config("https://gw.example.com/paymongo").webhook_url().unwrap();
        assert_eq!(url.as_str(), "https://gw.example.com/paymongo?action=webhook");
    }

    #[test]
    fn test_validate_success() {
        assert!(config("https://gw.example.com")
            .validate(&Environment::Production)
            .is_ok());
    }

    #[test]
    fn test_http_allowed_outside_production() {
        assert!(config("http://localhost:8080")
            .validate(&Environment::Development)
            .is_ok());
    }

    #[test]
    fn test_http_rejected_in_production() {
        assert!(matches!(
            config("http://gw.example.com").validate(&Environment::Production),
            Err(ValidationError::PublicUrlMustBeHttps)
        ));
    }

    #[test]
    fn test_missing_public_url() {
        assert!(matches!(
            config("").validate(&Environment::Development),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_zero_max_sessions() {
        let mut config = config("https://gw.example.com");
        config.max_sessions = 0;
        assert!(matches!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidMaxSessions { value: 0, .. })
        ));
    }

    #[test]
    fn test_max_sessions_capped_at_default() {
        let mut config = config("https://gw.example.com");
        config.max_sessions = DEFAULT_MAX_SESSIONS;
        assert!(config.validate(&Environment::Development).is_ok());

        config.max_sessions = DEFAULT_MAX_SESSIONS + 1;
        let err = config.validate(&Environment::Development).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidMaxSessions { value: 1001, max: 1000 }
        ));
        assert_eq!(
            err.to_string(),
            "max_sessions must be between 1 and 1000, got 1001"
        );
    }
}
