//! Request/response DTOs for the admin endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::admin::AdminSummary;
use crate::domain::ledger::PaymentEventRecord;

/// Request body for `POST /api/admin/manage`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageAdminRequestDto {
    /// One of `list`, `grant`, `revoke`.
    pub action: String,

    #[serde(default)]
    pub target_email: Option<String>,

    #[serde(default)]
    pub target_uid: Option<String>,
}

/// Admin listing entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummaryDto {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_super_admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AdminSummary> for AdminSummaryDto {
    fn from(summary: AdminSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            email: summary.email,
            first_name: summary.first_name,
            last_name: summary.last_name,
            is_super_admin: summary.is_super_admin,
            created_at: *summary.created_at.as_datetime(),
        }
    }
}

/// Response body for `POST /api/admin/manage`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageAdminResponseDto {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admins: Option<Vec<AdminSummaryDto>>,
}

impl ManageAdminResponseDto {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            admins: None,
        }
    }

    pub fn admins(admins: Vec<AdminSummaryDto>) -> Self {
        Self {
            success: true,
            message: None,
            admins: Some(admins),
        }
    }
}

/// Processed payment event as shown in the admin transactions view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecordDto {
    pub event_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payment_intent_id: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub created: chrono::DateTime<chrono::Utc>,
    pub user_id: Option<String>,
    pub invoice_id: Option<String>,
    pub processed_at: chrono::DateTime<chrono::Utc>,
}

impl From<PaymentEventRecord> for PaymentRecordDto {
    fn from(record: PaymentEventRecord) -> Self {
        Self {
            event_id: record.event_id,
            event_type: record.event_type,
            payment_intent_id: record.payment_intent_id,
            amount: record.amount,
            currency: record.currency,
            status: record.status,
            created: *record.created.as_datetime(),
            user_id: record.user_id,
            invoice_id: record.invoice_id,
            processed_at: *record.processed_at.as_datetime(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_request_deserializes_actions() {
        let json = r#"{"action": "grant", "targetEmail": "new@example.com"}"#;
        let dto: ManageAdminRequestDto = serde_json::from_str(json).unwrap();

        assert_eq!(dto.action, "grant");
        assert_eq!(dto.target_email.as_deref(), Some("new@example.com"));
        assert!(dto.target_uid.is_none());
    }

    #[test]
    fn manage_response_omits_absent_fields() {
        let json = serde_json::to_value(ManageAdminResponseDto::message("done")).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert!(json.get("admins").is_none());
    }
}
