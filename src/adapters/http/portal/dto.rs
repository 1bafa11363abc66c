//! Request/response DTOs for the portal endpoints.
//!
//! The invoice/booking DTOs are the read-only ledger views the client
//! portal renders; they never expose anything the settlement path did not
//! persist.

use serde::{Deserialize, Serialize};

use crate::domain::ledger::{Booking, Invoice};

/// Request body for `POST /api/profile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequestDto {
    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub new_email: Option<String>,
}

/// Response body for `POST /api/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileResponseDto {
    pub success: bool,
    pub message: String,
}

/// Payment sub-record as rendered in ledger views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPaymentDto {
    pub status: String,
    pub method: Option<String>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Invoice ledger view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: String,
    pub booking_id: Option<String>,
    pub client_name: String,
    pub total: i64,
    pub amount_paid: i64,
    pub balance_due: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<LedgerPaymentDto>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id.to_string(),
            booking_id: invoice.booking_id.map(|b| b.to_string()),
            client_name: invoice.client_name,
            total: invoice.total,
            amount_paid: invoice.amount_paid,
            balance_due: invoice.balance_due,
            status: invoice.status.as_str().to_string(),
            payment: invoice.payment.map(|p| LedgerPaymentDto {
                status: p.status.as_str().to_string(),
                method: Some(p.method.as_str().to_string()),
                paid_at: Some(*p.paid_at.as_datetime()),
                transaction_id: Some(p.transaction_id),
            }),
            updated_at: *invoice.updated_at.as_datetime(),
        }
    }
}

/// Booking ledger view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    pub status: String,
    pub payment: LedgerPaymentDto,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Booking> for BookingDto {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            client_name: booking.client_name,
            client_email: booking.client_email,
            status: booking.status.as_str().to_string(),
            payment: LedgerPaymentDto {
                status: booking.payment.status.as_str().to_string(),
                method: booking.payment.method.map(|m| m.as_str().to_string()),
                paid_at: booking.payment.paid_at.map(|t| *t.as_datetime()),
                transaction_id: None,
            },
            updated_at: *booking.updated_at.as_datetime(),
        }
    }
}
