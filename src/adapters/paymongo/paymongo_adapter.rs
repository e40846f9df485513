//! PayMongo checkout provider adapter.
//!
//! Implements the `CheckoutProvider` port against the PayMongo REST API.
//!
//! # Security
//!
//! - HTTP basic auth with the secret key as user name and no password
//! - The key is held in `secrecy::SecretString` and never logged
//!
//! # Configuration
//!
//! ```ignore
//! let config = PayMongoConfig::new(secret_key);
//! let adapter = PayMongoCheckoutAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::GatewayError;
use crate::ports::{
    CheckoutProvider, CheckoutSessionDetails, CreateCheckoutRequest, CreatedCheckout,
};

use super::api_types::{CheckoutSessionResponse, CreateCheckoutBody};

/// Default PayMongo API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.paymongo.com/v1";

/// Connect timeout for outbound calls.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total request timeout for outbound calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// PayMongo API configuration.
#[derive(Clone)]
pub struct PayMongoConfig {
    /// Secret API key (sk_live_... or sk_test_...).
    secret_key: SecretString,

    /// Base URL for the API (default: https://api.paymongo.com/v1).
    api_base_url: String,
}

impl PayMongoConfig {
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            secret_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// PayMongo checkout provider adapter.
pub struct PayMongoCheckoutAdapter {
    secret_key: SecretString,
    api_base: Url,
    http_client: reqwest::Client,
}

impl PayMongoCheckoutAdapter {
    pub fn new(config: PayMongoConfig) -> Result<Self, GatewayError> {
        let api_base = Url::parse(&config.api_base_url).map_err(|e| {
            GatewayError::Transport(format!("invalid PayMongo URL {}: {}", config.api_base_url, e))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!(
                "invalid PayMongo URL {}",
                api_base
            )));
        }

        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            secret_key: config.secret_key,
            api_base,
            http_client,
        })
    }

    /// Appends percent-encoded path segments to the API base.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a request and decodes the checkout session body.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<CheckoutSessionResponse, GatewayError> {
        let response = request
            .basic_auth(self.secret_key.expose_secret(), Option::<&str>::None)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "PayMongo request failed");
                GatewayError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "PayMongo API error");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, body = %body, "PayMongo returned invalid JSON");
            GatewayError::InvalidResponse(format!("invalid JSON: {}", e))
        })
    }
}

#[async_trait]
impl CheckoutProvider for PayMongoCheckoutAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CreatedCheckout, GatewayError> {
        let body = CreateCheckoutBody::from_request(&request);
        let response = self
            .send(
                self.http_client
                    .post(self.endpoint(&["checkout_sessions"]))
                    .json(&body),
            )
            .await?;

        let session_id = response
            .session_id()
            .ok_or_else(|| GatewayError::InvalidResponse("missing checkout session id".into()))
            .and_then(|id| {
                CheckoutSessionId::new(id).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
            })?;
        let checkout_url = response
            .checkout_url()
            .ok_or_else(|| GatewayError::InvalidResponse("missing checkout_url".into()))?
            .to_string();

        tracing::info!(
            session_id = %session_id,
            amount_minor = request.amount_minor,
            "Created PayMongo checkout session"
        );

        Ok(CreatedCheckout {
            session_id,
            checkout_url,
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<CheckoutSessionDetails, GatewayError> {
        let url = self.endpoint(&["checkout_sessions", session_id.as_str()]);
        let response = self.send(self.http_client.get(url)).await?;

        if response.session_id().is_none() {
            return Err(GatewayError::InvalidResponse(
                "missing checkout session id".into(),
            ));
        }

        Ok(CheckoutSessionDetails {
            session_id: session_id.clone(),
            status: response.status().map(str::to_string),
            checkout_url: response.checkout_url().map(str::to_string),
            payment_ids: response.payment_ids(),
        })
    }
}
