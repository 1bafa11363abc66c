//! Error taxonomy for the charge-initiation flow.

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors surfaced by user-facing payment operations.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// Caller supplied an invalid argument.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// The payment processor rejected or failed the request. Relayed as an
    /// internal error to the caller, distinct from validation.
    #[error("Payment provider error: {0}")]
    Provider(String),

    /// Ledger or other infrastructure failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl PaymentsError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentsError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        PaymentsError::Provider(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentsError::Infrastructure(message.into())
    }
}

impl From<DomainError> for PaymentsError {
    fn from(err: DomainError) -> Self {
        PaymentsError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn validation_error_displays_field_and_message() {
        let err = PaymentsError::validation("amount", "must be positive");
        assert_eq!(
            format!("{}", err),
            "Validation failed for amount: must be positive"
        );
    }

    #[test]
    fn provider_error_displays_message() {
        let err = PaymentsError::provider("card declined");
        assert_eq!(format!("{}", err), "Payment provider error: card declined");
    }

    #[test]
    fn domain_error_converts_to_infrastructure() {
        let err: PaymentsError =
            DomainError::new(ErrorCode::DatabaseError, "connection lost").into();
        assert!(matches!(err, PaymentsError::Infrastructure(_)));
    }
}
