//! Gateway settings read from `PAYMONGO_GATEWAY__*` environment variables.
//!
//! ```no_run
//! use paymongo_gateway::config::AppConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! println!("Register {} with PayMongo", config.gateway.webhook_url()?);
//! # Ok(())
//! # }
//! ```

mod billing;
mod error;
mod gateway;
mod payment;
mod server;

pub use billing::BillingConfig;
pub use error::{ConfigError, ValidationError};
pub use gateway::GatewayConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Everything the gateway needs at startup, one struct per section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listener, environment and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// PayMongo configuration (keys, payment methods, limits)
    pub paymongo: PaymentConfig,

    /// UISP configuration (API URL, app key)
    pub uisp: BillingConfig,

    /// Gateway configuration (public URL, session storage)
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Reads `PAYMONGO_GATEWAY__<SECTION>__<KEY>` variables, after loading a
    /// `.env` file when one exists.
    ///
    /// `PAYMONGO_GATEWAY__PAYMONGO__SECRET_KEY=sk_test_...` sets
    /// `paymongo.secret_key`. Missing required keys and unparseable values
    /// are load errors; semantic checks happen in [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMONGO_GATEWAY")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Checks every section; the first failure is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.paymongo.validate()?;
        self.uisp.validate()?;
        self.gateway.validate(&self.server.environment)
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
