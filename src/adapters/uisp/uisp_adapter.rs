//! UISP (UCRM) billing adapter.
//!
//! Implements the `BillingSystem` port over the UCRM REST API at
//! `{url}/api/v1.0`, authenticated with the plugin's `X-Auth-App-Key`.
//!
//! The local UISP URL usually serves a self-signed certificate, so
//! certificate checks can be switched off through configuration.

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::adapters::paymongo::{CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::domain::foundation::InvoiceId;
use crate::domain::payment::BillingError;
use crate::ports::{BillingSystem, Invoice, NewPayment, RecordedPayment, ResolvedPaymentToken};

/// Header carrying the UCRM app key.
pub const APP_KEY_HEADER: &str = "X-Auth-App-Key";

/// UISP API configuration.
#[derive(Clone)]
pub struct UispConfig {
    /// UISP base URL, without the `/api/v1.0` suffix.
    url: String,

    /// Plugin app key.
    app_key: SecretString,

    /// Skip TLS certificate verification (self-signed local installs).
    accept_invalid_certs: bool,
}

impl UispConfig {
    pub fn new(url: impl Into<String>, app_key: SecretString) -> Self {
        Self {
            url: url.into(),
            app_key,
            accept_invalid_certs: false,
        }
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// UISP billing adapter.
pub struct UispBillingAdapter {
    app_key: SecretString,
    api_base: Url,
    http_client: reqwest::Client,
}

impl UispBillingAdapter {
    pub fn new(config: UispConfig) -> Result<Self, BillingError> {
        let api_base = format!("{}/api/v1.0", config.url.trim_end_matches('/'));
        let api_base = Url::parse(&api_base)
            .map_err(|e| BillingError::Transport(format!("invalid UISP URL {}: {}", api_base, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(BillingError::Transport(format!(
                "invalid UISP URL {}",
                api_base
            )));
        }

        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| BillingError::Transport(e.to_string()))?;

        Ok(Self {
            app_key: config.app_key,
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

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BillingError> {
        let response = request
            .header(APP_KEY_HEADER, self.app_key.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "UISP request failed");
                BillingError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BillingError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "UISP API error");
            return Err(BillingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            tracing::warn!(error = %e, body = %body, "UISP returned an unexpected body");
            BillingError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait]
impl BillingSystem for UispBillingAdapter {
    async fn resolve_payment_token(
        &self,
        token: &str,
    ) -> Result<ResolvedPaymentToken, BillingError> {
        let url = self.endpoint(&["payment-tokens", token]);
        self.send(self.http_client.get(url)).await
    }

    async fn get_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, BillingError> {
        let id = invoice_id.to_string();
        let url = self.endpoint(&["invoices", &id]);
        self.send(self.http_client.get(url)).await
    }

    async fn create_payment(&self, payment: &NewPayment) -> Result<RecordedPayment, BillingError> {
        let url = self.endpoint(&["payments"]);
        let recorded: RecordedPayment = self.send(self.http_client.post(url).json(payment)).await?;

        tracing::info!(
            client_id = %payment.client_id,
            amount = %payment.amount,
            uisp_payment_id = ?recorded.id,
            "Recorded payment in UISP"
        );
        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::foundation::ClientId;

    const APP_KEY: &str = "uisp-app-key";

    fn adapter(server: &MockServer) -> UispBillingAdapter {
        let config = UispConfig::new(format!("{}/", server.uri()), SecretString::new(APP_KEY.into()));
        UispBillingAdapter::new(config).unwrap()
    }

    fn payment() -> NewPayment {
        NewPayment {
            client_id: ClientId::new(7),
            amount: Decimal::new(79900, 2),
            method_id: "method-uuid".to_string(),
            currency_code: "PHP".to_string(),
            created_date: Utc::now(),
            note: "PayMongo - gcash".to_string(),
            provider_name: "PayMongo".to_string(),
            provider_payment_id: "pay_1".to_string(),
            invoice_ids: vec![InvoiceId::new(42)],
        }
    }

    #[test]
    fn rejects_unusable_base_url() {
        let config = UispConfig::new("not a url", SecretString::new(APP_KEY.into()));
        assert!(UispBillingAdapter::new(config).is_err());
    }

    #[tokio::test]
    async fn resolves_payment_token_with_app_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/payment-tokens/tok_abc"))
            .and(header(APP_KEY_HEADER, APP_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "invoiceId": 42, "clientId": 7, "amount": 799.0, "currency": "PHP"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = adapter(&server).resolve_payment_token("tok_abc").await.unwrap();

        assert_eq!(token.invoice_id, Some(InvoiceId::new(42)));
        assert_eq!(token.amount, Some(Decimal::new(799, 0)));
    }

    #[tokio::test]
    async fn token_is_percent_encoded_in_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/payment-tokens/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let token = adapter(&server).resolve_payment_token("a/b").await.unwrap();
        assert_eq!(token, ResolvedPaymentToken::default());
    }

    #[tokio::test]
    async fn unknown_token_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/payment-tokens/expired"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let err = adapter(&server).resolve_payment_token("expired").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn fetches_invoice_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/invoices/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 42, "number": "2024-0042", "total": 799.0
            })))
            .mount(&server)
            .await;

        let invoice = adapter(&server).get_invoice(InvoiceId::new(42)).await.unwrap();
        assert_eq!(invoice.number.as_deref(), Some("2024-0042"));
    }

    #[tokio::test]
    async fn creates_payment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/payments"))
            .and(header(APP_KEY_HEADER, APP_KEY))
            .and(body_partial_json(serde_json::json!({
                "clientId": 7,
                "amount": 799.0,
                "methodId": "method-uuid",
                "currencyCode": "PHP",
                "providerName": "PayMongo",
                "providerPaymentId": "pay_1",
                "invoiceIds": [42]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 555})))
            .expect(1)
            .mount(&server)
            .await;

        let recorded = adapter(&server).create_payment(&payment()).await.unwrap();
        assert_eq!(recorded.id, Some(555));
    }

    #[tokio::test]
    async fn empty_success_body_decodes_as_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/payments"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let recorded = adapter(&server).create_payment(&payment()).await.unwrap();
        assert_eq!(recorded, RecordedPayment::default());
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/payments"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = adapter(&server).create_payment(&payment()).await.unwrap_err();
        assert_eq!(
            err,
            BillingError::Status {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn invalid_json_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/invoices/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = adapter(&server).get_invoice(InvoiceId::new(1)).await.unwrap_err();
        assert!(matches!(err, BillingError::InvalidResponse(_)));
    }
}
