//! HTTP handlers for the payment endpoints.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::payments::{
    CallerIdentity, CreatePaymentIntentCommand, ProcessWebhookEventCommand,
};

use super::super::auth::MaybeAuthenticated;
use super::super::error::{ApiError, ErrorResponse};
use super::super::AppState;
use super::dto::{CreateIntentRequestDto, CreateIntentResponseDto, WebhookAck};

/// POST /api/payments/intent - Open a payment intent.
///
/// Works for authenticated and guest callers; only the client secret leaves
/// the server.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    MaybeAuthenticated(caller): MaybeAuthenticated,
    Json(request): Json<CreateIntentRequestDto>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.create_payment_intent_handler();

    let cmd = CreatePaymentIntentCommand {
        amount: request.amount,
        currency: request.currency,
        invoice_id: request.invoice_id,
        caller: caller.map(|c| CallerIdentity {
            user_id: c.user_id,
            email: c.email,
        }),
        guest_email: request.email,
    };

    let result = handler.handle(cmd).await?;

    let response = CreateIntentResponseDto {
        client_secret: result.client_secret,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/webhooks/stripe - Processor webhook endpoint.
///
/// The body must stay raw for signature verification, so this handler takes
/// `Bytes` rather than a typed extractor. Every durably-recorded outcome
/// (processed, deduplicated, or ignored-type) acknowledges with
/// `200 {"received": true}`; signature failures get 400 with no state
/// change, and failures before the event record commits get 5xx so the
/// processor retries.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.webhook_handler();
    let cmd = ProcessWebhookEventCommand {
        payload: body.to_vec(),
        signature,
    };

    match handler.handle(cmd).await {
        Ok(_) => (StatusCode::OK, Json(WebhookAck { received: true })).into_response(),
        Err(err) => {
            let status = err.status_code();
            let body = ErrorResponse::new("WEBHOOK_ERROR", err.to_string());
            (status, Json(body)).into_response()
        }
    }
}
