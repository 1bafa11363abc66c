//! Request/response DTOs for the payment endpoints.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/payments/intent`.
///
/// `amount` is a JSON number of minor currency units; fractional input is
/// rounded server-side rather than rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequestDto {
    pub amount: f64,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub invoice_id: Option<String>,

    /// Guest checkout email; ignored when the caller is authenticated.
    #[serde(default)]
    pub email: Option<String>,
}

/// Response body for `POST /api/payments/intent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponseDto {
    pub client_secret: String,
}

/// Acknowledgement body for the webhook endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_request_deserializes_camel_case() {
        let json = r#"{
            "amount": 24900,
            "currency": "usd",
            "invoiceId": "inv-1",
            "email": "guest@example.com"
        }"#;

        let dto: CreateIntentRequestDto = serde_json::from_str(json).unwrap();

        assert_eq!(dto.amount, 24900.0);
        assert_eq!(dto.invoice_id.as_deref(), Some("inv-1"));
    }

    #[test]
    fn intent_request_optional_fields_default() {
        let dto: CreateIntentRequestDto = serde_json::from_str(r#"{"amount": 100}"#).unwrap();

        assert!(dto.currency.is_none());
        assert!(dto.invoice_id.is_none());
        assert!(dto.email.is_none());
    }

    #[test]
    fn intent_response_serializes_camel_case() {
        let dto = CreateIntentResponseDto {
            client_secret: "pi_1_secret_2".to_string(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["clientSecret"], "pi_1_secret_2");
    }
}
