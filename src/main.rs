//! Studio Ledger service entry point.
//!
//! Composition root: loads and validates configuration, initializes
//! tracing, connects the database pool, constructs the adapters, and serves
//! the axum router. The Stripe gateway and webhook verifier are built once
//! here and injected; no component lazily initializes its own client.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use studio_ledger::adapters::http::{app_router, AppState};
use studio_ledger::adapters::postgres::{
    PostgresBookingRepository, PostgresInvoiceRepository, PostgresLedgerReader,
    PostgresPaymentEventRepository, PostgresSettlementRetryQueue, PostgresUserRepository,
};
use studio_ledger::adapters::stripe::{StripeConfig, StripeGateway};
use studio_ledger::config::AppConfig;
use studio_ledger::domain::payments::WebhookSignatureVerifier;

#[tokio::main]
async fn main() {
    let config = AppConfig::load().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    config.validate().expect("Invalid configuration");

    if config.payment.is_live_mode() {
        tracing::info!("Stripe configured in live mode");
    } else {
        tracing::info!("Stripe configured in test mode");
    }

    // Database connection
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Payment processor client, constructed once and injected.
    let gateway = Arc::new(StripeGateway::new(StripeConfig::new(
        config.payment.stripe_api_key.clone(),
    )));

    let webhook_verifier = match &config.payment.stripe_webhook_secret {
        Some(secret) if !secret.is_empty() => {
            Some(Arc::new(WebhookSignatureVerifier::new(secret.clone())))
        }
        _ => {
            tracing::warn!(
                "STRIPE_WEBHOOK_SECRET is not configured: webhook signatures will NOT be \
                 verified. This is a degraded, test-only mode."
            );
            None
        }
    };

    let state = AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        payment_provider: gateway,
        payment_events: Arc::new(PostgresPaymentEventRepository::new(pool.clone())),
        invoices: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
        bookings: Arc::new(PostgresBookingRepository::new(pool.clone())),
        settlement_retries: Arc::new(PostgresSettlementRetryQueue::new(pool.clone())),
        ledger: Arc::new(PostgresLedgerReader::new(pool.clone())),
        webhook_verifier,
    };

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    let addr = config.server.socket_addr();
    tracing::info!("Studio ledger listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
