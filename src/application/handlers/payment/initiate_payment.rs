//! InitiatePaymentHandler - Command handler for starting a PayMongo checkout.
//!
//! Resolves the UISP payment token, creates a hosted checkout session and
//! records it as pending so the paid webhook can be reconciled later.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Url;

use crate::domain::foundation::{CheckoutSessionId, InvoiceId};
use crate::domain::payment::{
    to_minor_units, CheckoutSession, InitiatePaymentError, PaymentToken, DEFAULT_MINIMUM_MINOR,
};
use crate::ports::{BillingSystem, CheckoutProvider, CreateCheckoutRequest, SessionStore};

/// Command to start a payment for a UISP payment token.
#[derive(Debug, Clone)]
pub struct InitiatePaymentCommand {
    /// Token from the UISP "pay online" link (`_token`).
    pub token: String,
}

/// Checkout the customer should be redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatePaymentResult {
    pub session_id: CheckoutSessionId,
    pub checkout_url: String,
    pub invoice_id: InvoiceId,
}

/// Settings for building checkout sessions.
#[derive(Debug, Clone)]
pub struct InitiatePaymentSettings {
    /// Public URL of this gateway; success and cancel redirects point here.
    pub public_url: Url,

    /// Shown in the checkout description.
    pub merchant_name: String,

    /// Used when the payment token carries no currency.
    pub default_currency: String,

    pub payment_method_types: Vec<String>,

    /// Smallest accepted amount in minor units.
    pub min_amount_minor: i64,
}

impl InitiatePaymentSettings {
    pub fn new(public_url: Url, payment_method_types: Vec<String>) -> Self {
        Self {
            public_url,
            merchant_name: "Imperial Networks".to_string(),
            default_currency: "PHP".to_string(),
            payment_method_types,
            min_amount_minor: DEFAULT_MINIMUM_MINOR,
        }
    }

    fn redirect_url(&self, action: &str, invoice_id: InvoiceId) -> String {
        let mut url = self.public_url.clone();
        url.query_pairs_mut()
            .append_pair("action", action)
            .append_pair("invoice_id", &invoice_id.to_string());
        url.to_string()
    }
}

/// Handler for payment initiation.
pub struct InitiatePaymentHandler {
    billing: Arc<dyn BillingSystem>,
    checkout_provider: Arc<dyn CheckoutProvider>,
    session_store: Arc<dyn SessionStore>,
    settings: InitiatePaymentSettings,
}

impl InitiatePaymentHandler {
    pub fn new(
        billing: Arc<dyn BillingSystem>,
        checkout_provider: Arc<dyn CheckoutProvider>,
        session_store: Arc<dyn SessionStore>,
        settings: InitiatePaymentSettings,
    ) -> Self {
        Self {
            billing,
            checkout_provider,
            session_store,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: InitiatePaymentCommand,
    ) -> Result<InitiatePaymentResult, InitiatePaymentError> {
        // 1. Token must be present
        let token = cmd.token.trim();
        if token.is_empty() {
            return Err(InitiatePaymentError::InvalidRequest);
        }
        let token_ref = token_prefix(token);

        // 2. Resolve token into invoice, client and amount
        let resolved = self
            .billing
            .resolve_payment_token(token)
            .await
            .map_err(|e| {
                tracing::error!(token = %token_ref, error = %e, "Failed to resolve payment token");
                InitiatePaymentError::Token(e)
            })?;

        let payment = PaymentToken::from_parts(
            resolved.invoice_id,
            resolved.client_id,
            resolved.amount,
            resolved.currency,
            &self.settings.default_currency,
        )
        .map_err(|missing| {
            tracing::error!(token = %token_ref, missing = missing.as_str(), "Payment token data incomplete");
            InitiatePaymentError::InvalidPaymentData(missing.as_str())
        })?;

        // 3. Enforce the amount floor before creating anything
        let amount_minor = to_minor_units(payment.amount)
            .ok_or(InitiatePaymentError::InvalidPaymentData("amount"))?;
        if amount_minor < self.settings.min_amount_minor {
            tracing::warn!(
                invoice_id = %payment.invoice_id,
                amount_minor,
                minimum_minor = self.settings.min_amount_minor,
                "Payment amount below minimum"
            );
            return Err(InitiatePaymentError::AmountTooSmall {
                amount_minor,
                minimum_minor: self.settings.min_amount_minor,
            });
        }

        // 4. Invoice number, best effort
        let invoice_number = self.invoice_number(payment.invoice_id).await;

        // 5. Create the checkout session
        let description = format!(
            "Invoice #{} - {}",
            invoice_number, self.settings.merchant_name
        );
        let request = CreateCheckoutRequest {
            amount_minor,
            currency: payment.currency.clone(),
            description,
            payment_method_types: self.settings.payment_method_types.clone(),
            success_url: self.settings.redirect_url("success", payment.invoice_id),
            cancel_url: self.settings.redirect_url("cancel", payment.invoice_id),
            metadata: checkout_metadata(&payment, &invoice_number),
        };

        let checkout = self
            .checkout_provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    invoice_id = %payment.invoice_id,
                    error = %e,
                    "Failed to create checkout session"
                );
                InitiatePaymentError::Gateway(e)
            })?;

        // 6. Track it as pending
        let session = CheckoutSession::pending(
            checkout.session_id.clone(),
            &payment,
            amount_minor,
            invoice_number,
        );
        self.session_store.save(&session).await.map_err(|e| {
            tracing::error!(
                session_id = %checkout.session_id,
                invoice_id = %payment.invoice_id,
                error = %e,
                "Failed to store checkout session"
            );
            InitiatePaymentError::Storage(e)
        })?;

        tracing::info!(
            session_id = %checkout.session_id,
            invoice_id = %payment.invoice_id,
            client_id = %payment.client_id,
            amount_minor,
            "Checkout session created"
        );

        Ok(InitiatePaymentResult {
            session_id: checkout.session_id,
            checkout_url: checkout.checkout_url,
            invoice_id: payment.invoice_id,
        })
    }

    async fn invoice_number(&self, invoice_id: InvoiceId) -> String {
        match self.billing.get_invoice(invoice_id).await {
            Ok(invoice) => {
                if let Some(number) = invoice.number.filter(|n| !n.trim().is_empty()) {
                    return number;
                }
            }
            Err(e) => {
                tracing::warn!(invoice_id = %invoice_id, error = %e, "Could not fetch invoice number");
            }
        }
        format!("INV-{}", invoice_id)
    }
}

fn checkout_metadata(payment: &PaymentToken, invoice_number: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("invoice_id".to_string(), payment.invoice_id.to_string()),
        ("client_id".to_string(), payment.client_id.to_string()),
        ("amount".to_string(), payment.amount.to_string()),
        ("invoice_number".to_string(), invoice_number.to_string()),
    ])
}

/// First 8 characters of a token, for logs.
pub fn token_prefix(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::paymongo::MockCheckoutProvider;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::adapters::uisp::MockBillingSystem;
    use crate::domain::foundation::ClientId;
    use crate::domain::payment::{BillingError, GatewayError, SessionStatus};
    use crate::ports::{CreatedCheckout, Invoice, ResolvedPaymentToken};
    use rust_decimal::Decimal;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    struct Fixture {
        billing: MockBillingSystem,
        provider: MockCheckoutProvider,
        store: InMemorySessionStore,
        handler: InitiatePaymentHandler,
    }

    fn fixture() -> Fixture {
        let billing = MockBillingSystem::new();
        billing.set_token(ResolvedPaymentToken {
            invoice_id: Some(InvoiceId::new(42)),
            client_id: Some(ClientId::new(7)),
            amount: Some(Decimal::new(79900, 2)),
            currency: Some("PHP".to_string()),
        });
        billing.set_invoice(Invoice {
            id: Some(InvoiceId::new(42)),
            number: Some("2024-0042".to_string()),
        });

        let provider = MockCheckoutProvider::new();
        provider.set_checkout(CreatedCheckout {
            session_id: CheckoutSessionId::new("cs_test_1").unwrap(),
            checkout_url: "https://checkout.paymongo.com/cs_test_1".to_string(),
        });

        let store = InMemorySessionStore::new();
        let settings = InitiatePaymentSettings::new(
            Url::parse("https://pay.example.com/paymongo").unwrap(),
            vec!["gcash".to_string(), "card".to_string()],
        );

        let handler = InitiatePaymentHandler::new(
            Arc::new(billing.clone()),
            Arc::new(provider.clone()),
            Arc::new(store.clone()),
            settings,
        );

        Fixture {
            billing,
            provider,
            store,
            handler,
        }
    }

    fn cmd(token: &str) -> InitiatePaymentCommand {
        InitiatePaymentCommand {
            token: token.to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Path
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_checkout_and_pending_session() {
        let f = fixture();

        let result = f.handler.handle(cmd("tok_abcdef123456")).await.unwrap();

        assert_eq!(result.checkout_url, "https://checkout.paymongo.com/cs_test_1");
        assert_eq!(result.invoice_id, InvoiceId::new(42));

        let session = f.store.load(&result.session_id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.amount_minor, 79900);
        assert_eq!(session.invoice_number, "2024-0042");
        assert_eq!(session.client_id, ClientId::new(7));
    }

    #[tokio::test]
    async fn checkout_request_carries_description_urls_and_metadata() {
        let f = fixture();
        f.handler.handle(cmd("tok_abcdef123456")).await.unwrap();

        let request = &f.provider.requests()[0];
        assert_eq!(request.amount_minor, 79900);
        assert_eq!(request.currency, "PHP");
        assert_eq!(request.description, "Invoice #2024-0042 - Imperial Networks");
        assert_eq!(request.payment_method_types, vec!["gcash", "card"]);
        assert_eq!(
            request.success_url,
            "https://pay.example.com/paymongo?action=success&invoice_id=42"
        );
        assert_eq!(
            request.cancel_url,
            "https://pay.example.com/paymongo?action=cancel&invoice_id=42"
        );
        assert_eq!(request.metadata["invoice_id"], "42");
        assert_eq!(request.metadata["client_id"], "7");
        assert_eq!(request.metadata["amount"], "799.00");
        assert_eq!(request.metadata["invoice_number"], "2024-0042");
    }

    #[tokio::test]
    async fn invoice_lookup_failure_falls_back_to_generated_number() {
        let f = fixture();
        f.billing
            .fail_invoice_lookup(BillingError::Transport("timeout".into()));

        let result = f.handler.handle(cmd("tok_abcdef123456")).await.unwrap();

        let session = f.store.load(&result.session_id).await.unwrap().unwrap();
        assert_eq!(session.invoice_number, "INV-42");
        assert_eq!(
            f.provider.requests()[0].description,
            "Invoice #INV-42 - Imperial Networks"
        );
    }

    #[tokio::test]
    async fn missing_currency_uses_default() {
        let f = fixture();
        f.billing.set_token(ResolvedPaymentToken {
            invoice_id: Some(InvoiceId::new(42)),
            client_id: Some(ClientId::new(7)),
            amount: Some(Decimal::new(50000, 2)),
            currency: None,
        });

        f.handler.handle(cmd("tok_abcdef123456")).await.unwrap();
        assert_eq!(f.provider.requests()[0].currency, "PHP");
    }

    #[tokio::test]
    async fn half_centavo_rounds_away_from_zero() {
        let f = fixture();
        f.billing.set_token(ResolvedPaymentToken {
            invoice_id: Some(InvoiceId::new(42)),
            client_id: Some(ClientId::new(7)),
            amount: Some(Decimal::new(10005, 3)),
            currency: None,
        });

        f.handler.handle(cmd("tok_abcdef123456")).await.unwrap();
        assert_eq!(f.provider.requests()[0].amount_minor, 1001);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Paths
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn empty_token_is_invalid_request() {
        let f = fixture();

        let err = f.handler.handle(cmd("   ")).await.unwrap_err();

        assert!(matches!(err, InitiatePaymentError::InvalidRequest));
        assert!(f.billing.token_lookups().is_empty());
    }

    #[tokio::test]
    async fn unresolvable_token_is_token_error() {
        let f = fixture();
        f.billing.fail_token_lookup(BillingError::Status {
            status: 404,
            body: "Not found".into(),
        });

        let err = f.handler.handle(cmd("tok_expired")).await.unwrap_err();
        assert!(matches!(err, InitiatePaymentError::Token(_)));
        assert_eq!(f.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn incomplete_token_is_invalid_payment_data() {
        let f = fixture();
        f.billing.set_token(ResolvedPaymentToken {
            invoice_id: Some(InvoiceId::new(42)),
            client_id: None,
            amount: Some(Decimal::ONE_HUNDRED),
            currency: None,
        });

        let err = f.handler.handle(cmd("tok_abcdef123456")).await.unwrap_err();
        assert!(matches!(err, InitiatePaymentError::InvalidPaymentData("clientId")));
    }

    #[tokio::test]
    async fn zero_ids_are_rejected_before_checkout() {
        let cases = [
            (0, 7, "invoiceId"),
            (42, 0, "clientId"),
        ];
        for (invoice_id, client_id, field) in cases {
            let f = fixture();
            f.billing.set_token(ResolvedPaymentToken {
                invoice_id: Some(InvoiceId::new(invoice_id)),
                client_id: Some(ClientId::new(client_id)),
                amount: Some(Decimal::new(79900, 2)),
                currency: None,
            });

            let err = f.handler.handle(cmd("tok_abcdef123456")).await.unwrap_err();

            assert!(
                matches!(err, InitiatePaymentError::InvalidPaymentData(missing) if missing == field)
            );
            assert_eq!(f.provider.call_count(), 0);
            assert!(f.store.is_empty().await);
        }
    }

    #[tokio::test]
    async fn amount_below_minimum_is_rejected_before_checkout() {
        let f = fixture();
        f.billing.set_token(ResolvedPaymentToken {
            invoice_id: Some(InvoiceId::new(42)),
            client_id: Some(ClientId::new(7)),
            amount: Some(Decimal::new(99, 2)),
            currency: None,
        });

        let err = f.handler.handle(cmd("tok_abcdef123456")).await.unwrap_err();

        assert!(matches!(
            err,
            InitiatePaymentError::AmountTooSmall {
                amount_minor: 99,
                minimum_minor: 100
            }
        ));
        assert_eq!(f.provider.call_count(), 0);
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn gateway_failure_persists_nothing() {
        let f = fixture();
        f.provider.set_error(GatewayError::Status {
            status: 401,
            body: "unauthorized".into(),
        });

        let err = f.handler.handle(cmd("tok_abcdef123456")).await.unwrap_err();

        assert!(matches!(err, InitiatePaymentError::Gateway(_)));
        assert!(f.store.is_empty().await);
    }

    #[test]
    fn token_prefix_keeps_first_eight_chars() {
        assert_eq!(token_prefix("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(token_prefix("abc"), "abc...");
    }
}
