//! Axum router for the admin endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{list_payments, manage_admin};

/// Admin routes, mounted at `/api/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/manage", post(manage_admin))
        .route("/payments", get(list_payments))
}
