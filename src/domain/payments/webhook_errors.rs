//! Webhook error types for processor webhook handling.
//!
//! Defines all error conditions that can occur during webhook processing,
//! with HTTP status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature verification is configured but no signature header arrived.
    #[error("Missing signature header")]
    MissingSignatureHeader,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Ledger write failed before the event could be durably recorded.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the processor should retry delivering this webhook.
    ///
    /// Only failures before the dedup marker is written are retryable; once
    /// the event is recorded, redelivery would be deduplicated anyway.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine the processor's retry behavior:
    /// - 2xx: event acknowledged, no retry
    /// - 4xx: client error, no retry
    /// - 5xx: server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Authentication and malformed-input failures - don't retry
            WebhookError::InvalidSignature
            | WebhookError::MissingSignatureHeader
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            // Server errors - processor will retry
            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_signature_displays_correctly() {
        let err = WebhookError::InvalidSignature;
        assert_eq!(format!("{}", err), "Invalid signature");
    }

    #[test]
    fn parse_error_displays_message() {
        let err = WebhookError::ParseError("invalid JSON".to_string());
        assert_eq!(format!("{}", err), "Parse error: invalid JSON");
    }

    #[test]
    fn database_error_is_retryable() {
        let err = WebhookError::Database("connection failed".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn signature_failures_are_not_retryable() {
        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::TimestampOutOfRange.is_retryable());
        assert!(!WebhookError::ParseError("x".to_string()).is_retryable());
    }

    #[test]
    fn signature_failures_map_to_bad_request() {
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::MissingSignatureHeader.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::TimestampOutOfRange.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidTimestamp.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn parse_error_maps_to_bad_request() {
        let err = WebhookError::ParseError("bad json".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_maps_to_internal_error() {
        let err = WebhookError::Database("connection lost".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
