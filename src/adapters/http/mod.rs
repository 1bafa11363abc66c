//! HTTP adapter - axum routers, handlers, and DTOs.

pub mod admin;
pub mod auth;
pub mod error;
pub mod payments;
pub mod portal;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};

use crate::application::handlers::admin::{ManageAdminsHandler, UpdateProfileHandler};
use crate::application::handlers::payments::{
    CreatePaymentIntentHandler, ProcessWebhookEventHandler,
};
use crate::domain::payments::WebhookSignatureVerifier;
use crate::ports::{
    BookingRepository, InvoiceRepository, LedgerReader, PaymentEventRepository, PaymentProvider,
    SettlementRetryQueue, UserRepository,
};

/// Shared application state.
///
/// Cloned per request; all dependencies are Arc-wrapped trait objects
/// constructed at the composition root.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub payment_events: Arc<dyn PaymentEventRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub settlement_retries: Arc<dyn SettlementRetryQueue>,
    pub ledger: Arc<dyn LedgerReader>,

    /// `None` when no webhook signing secret is configured (degraded mode).
    pub webhook_verifier: Option<Arc<WebhookSignatureVerifier>>,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.users.clone(), self.payment_provider.clone())
    }

    pub fn webhook_handler(&self) -> ProcessWebhookEventHandler {
        ProcessWebhookEventHandler::new(
            self.webhook_verifier.clone(),
            self.payment_events.clone(),
            self.invoices.clone(),
            self.bookings.clone(),
            self.settlement_retries.clone(),
        )
    }

    pub fn manage_admins_handler(&self) -> ManageAdminsHandler {
        ManageAdminsHandler::new(self.users.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(self.users.clone())
    }
}

/// Build the complete application router.
///
/// # Routes
///
/// - `GET  /api/health` - liveness probe
/// - `POST /api/payments/intent` - open a payment intent
/// - `POST /api/webhooks/stripe` - processor webhook (signature-verified)
/// - `POST /api/admin/manage` - admin role management (super-admin gated)
/// - `GET  /api/admin/payments` - processed payment events (admin gated)
/// - `POST /api/profile` - self-service profile update
/// - `GET  /api/invoices/{id}` - invoice ledger read
/// - `GET  /api/bookings/{id}` - booking ledger read
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/payments", payments::payment_routes())
        .nest("/api/webhooks", payments::webhook_routes())
        .nest("/api/admin", admin::admin_routes())
        .merge(portal::portal_routes())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "studio-ledger",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
