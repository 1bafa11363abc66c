//! Axum router for the portal endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{get_booking, get_invoice, update_profile};

/// Portal routes, mounted at the API root.
pub fn portal_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", post(update_profile))
        .route("/api/invoices/:id", get(get_invoice))
        .route("/api/bookings/:id", get(get_booking))
}
