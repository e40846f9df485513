//! Startup configuration failures

use thiserror::Error;

/// Failure to read configuration from the environment or `.env`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded setting that the gateway cannot start with
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address")]
    InvalidBindAddress,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid PayMongo secret key format")]
    InvalidPayMongoKey,

    #[error("No payment method types configured")]
    NoPaymentMethodTypes,

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Minimum amount must be positive")]
    InvalidMinimumAmount,

    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("Gateway public URL must use HTTPS in production")]
    PublicUrlMustBeHttps,

    #[error("max_sessions must be between 1 and {max}, got {value}")]
    InvalidMaxSessions { value: usize, max: usize },
}
