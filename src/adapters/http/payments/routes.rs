//! Axum routers for the payment endpoints.

use axum::routing::post;
use axum::Router;

use super::super::AppState;
use super::handlers::{create_payment_intent, stripe_webhook};

/// Caller-invoked payment routes, mounted at `/api/payments`.
pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/intent", post(create_payment_intent))
}

/// Processor webhook routes, mounted at `/api/webhooks`.
///
/// Separate from the payment routes because webhooks carry no user
/// authentication; the signature is the credential.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(stripe_webhook))
}
