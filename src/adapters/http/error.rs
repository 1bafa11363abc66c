//! HTTP error mapping.
//!
//! Converts application-layer errors into JSON error responses. Provider
//! failures are deliberately relayed as internal errors, distinct from
//! user-facing validation errors.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::handlers::admin::AdminGateError;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payments::PaymentsError;

/// JSON error body: `{"error": {"code", "message"}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// API error carrying its HTTP mapping.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "PERMISSION_DENIED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", message)
    }
}

impl From<PaymentsError> for ApiError {
    fn from(err: PaymentsError) -> Self {
        match &err {
            PaymentsError::Validation { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
            }
            // Processor failures surface as internal errors, never as
            // caller mistakes.
            PaymentsError::Provider(_) | PaymentsError::Infrastructure(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        }
    }
}

impl From<AdminGateError> for ApiError {
    fn from(err: AdminGateError) -> Self {
        match &err {
            AdminGateError::PermissionDenied(_) => {
                Self::new(StatusCode::FORBIDDEN, "PERMISSION_DENIED", err.to_string())
            }
            AdminGateError::InvalidArgument(_) => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", err.to_string())
            }
            AdminGateError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            AdminGateError::Infrastructure(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let (status, code) = match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            ErrorCode::UserNotFound
            | ErrorCode::InvoiceNotFound
            | ErrorCode::BookingNotFound
            | ErrorCode::PaymentEventNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorCode::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ErrorCode::Forbidden => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            ErrorCode::PaymentProviderError
            | ErrorCode::DatabaseError
            | ErrorCode::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        Self::new(status, code, err.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse::new(self.code, self.message);
        (self.status, Json(body)).into_response()
    }
}
