//! PayMongo Gateway
//!
//! Accepts UISP "pay online" links, sends customers to PayMongo hosted
//! checkout, and records paid checkouts back into UISP from webhooks.
//!
//! ## Endpoints
//!
//! - `GET /pay?_token=...` - Start a checkout
//! - `POST /webhook` - PayMongo webhook
//! - `GET /success`, `GET /cancel` - Customer redirect pages
//! - `ANY /?action=...` - Combined entry point
//! - `GET /health` - Liveness probe
//! - `GET /status` - Session summary

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use paymongo_gateway::adapters::http::{
    payment_router, GatewaySettings, PageSettings, PaymentAppState,
};
use paymongo_gateway::adapters::paymongo::{PayMongoCheckoutAdapter, PayMongoConfig};
use paymongo_gateway::adapters::storage::FileSessionStore;
use paymongo_gateway::adapters::uisp::{UispBillingAdapter, UispConfig};
use paymongo_gateway::application::handlers::payment::{InitiatePaymentSettings, WebhookSettings};
use paymongo_gateway::config::{AppConfig, LogFormat};
use paymongo_gateway::domain::payment::SignatureVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load and validate configuration
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize logging
    init_tracing(&config)?;

    tracing::info!(
        environment = ?config.server.environment,
        test_mode = config.paymongo.is_test_mode(),
        sessions_file = %config.gateway.sessions_file.display(),
        "Starting PayMongo gateway"
    );

    let state = build_state(&config)?;
    tracing::info!(
        webhook_url = %state.settings.webhook_url,
        "Register this URL as the PayMongo webhook"
    );

    let app = build_router(state, Duration::from_secs(config.server.request_timeout_secs));

    let addr = config.server.socket_addr()?;
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    Ok(())
}

fn build_state(config: &AppConfig) -> anyhow::Result<PaymentAppState> {
    let paymongo = &config.paymongo;
    let public_url = config.gateway.public_url()?;

    let checkout_provider = PayMongoCheckoutAdapter::new(
        PayMongoConfig::new(paymongo.secret_key.clone()).with_base_url(&paymongo.api_base_url),
    )?;

    let billing = UispBillingAdapter::new(
        UispConfig::new(&config.uisp.url, config.uisp.app_key.clone())
            .with_accept_invalid_certs(config.uisp.accept_invalid_certs),
    )?;
    if config.uisp.accept_invalid_certs {
        tracing::warn!(url = %config.uisp.url, "Accepting invalid TLS certificates from UISP");
    }

    let session_store = FileSessionStore::new(&config.gateway.sessions_file)
        .with_max_sessions(config.gateway.max_sessions);

    let signature_verifier = SignatureVerifier::new(paymongo.webhook_secret.clone())
        .with_tolerance(paymongo.webhook_tolerance_secs);

    let mut initiate =
        InitiatePaymentSettings::new(public_url, paymongo.payment_method_types_list());
    initiate.merchant_name = paymongo.merchant_name.clone();
    initiate.default_currency = paymongo.currency.clone();
    initiate.min_amount_minor = paymongo.min_amount_minor;

    let settings = GatewaySettings {
        initiate,
        webhook: WebhookSettings {
            payment_method_id: paymongo.payment_method_id.clone(),
            default_currency: paymongo.currency.clone(),
        },
        pages: PageSettings {
            merchant_name: paymongo.merchant_name.clone(),
            client_zone_url: config.uisp.client_zone_url(),
        },
        mode: if paymongo.is_live_mode() { "live" } else { "test" },
        webhook_url: config.gateway.webhook_url()?.to_string(),
    };

    Ok(PaymentAppState {
        billing: Arc::new(billing),
        checkout_provider: Arc::new(checkout_provider),
        session_store: Arc::new(session_store),
        signature_verifier: Arc::new(signature_verifier),
        settings: Arc::new(settings),
    })
}

fn build_router(state: PaymentAppState, request_timeout: Duration) -> Router {
    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    payment_router(state).layer(middleware)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
