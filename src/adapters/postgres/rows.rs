//! Database row types shared by the repositories and the ledger reader.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::accounts::{Profile, Role, User};
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, InvoiceId, Timestamp, UserId,
};
use crate::domain::ledger::{
    Booking, BookingPayment, BookingStatus, Invoice, InvoicePayment, InvoiceStatus, PaymentMethod,
    PaymentEventRecord, PaymentStatus,
};

pub(super) fn parse_error(entity: &str, value: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", entity, value),
    )
}

#[derive(Debug, FromRow)]
pub(super) struct InvoiceRow {
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub client_name: String,
    pub total: i64,
    pub amount_paid: i64,
    pub balance_due: i64,
    pub status: String,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_paid_at: Option<DateTime<Utc>>,
    pub payment_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let status = InvoiceStatus::parse(&row.status)
            .ok_or_else(|| parse_error("invoice status", &row.status))?;

        // The payment sub-record exists only once settlement has written
        // all of its fields.
        let payment = match (
            row.payment_status.as_deref(),
            row.payment_method.as_deref(),
            row.payment_paid_at,
            row.payment_transaction_id,
        ) {
            (Some(p_status), Some(p_method), Some(paid_at), Some(transaction_id)) => {
                Some(InvoicePayment {
                    status: PaymentStatus::parse(p_status)
                        .ok_or_else(|| parse_error("payment status", p_status))?,
                    method: PaymentMethod::parse(p_method)
                        .ok_or_else(|| parse_error("payment method", p_method))?,
                    paid_at: Timestamp::from_datetime(paid_at),
                    transaction_id,
                })
            }
            _ => None,
        };

        Ok(Invoice {
            id: InvoiceId::from_uuid(row.id),
            booking_id: row.booking_id.map(BookingId::from_uuid),
            client_name: row.client_name,
            total: row.total,
            amount_paid: row.amount_paid,
            balance_due: row.balance_due,
            status,
            payment,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct BookingRow {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub payment_paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status)
            .ok_or_else(|| parse_error("booking status", &row.status))?;
        let payment_status = PaymentStatus::parse(&row.payment_status)
            .ok_or_else(|| parse_error("payment status", &row.payment_status))?;
        let payment_method = row
            .payment_method
            .as_deref()
            .map(|m| PaymentMethod::parse(m).ok_or_else(|| parse_error("payment method", m)))
            .transpose()?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            client_name: row.client_name,
            client_email: row.client_email,
            status,
            payment: BookingPayment {
                status: payment_status,
                method: payment_method,
                paid_at: row.payment_paid_at.map(Timestamp::from_datetime),
            },
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct PaymentRow {
    pub event_id: String,
    pub event_type: String,
    pub payment_intent_id: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub created: DateTime<Utc>,
    pub user_id: Option<String>,
    pub invoice_id: Option<String>,
    pub metadata: serde_json::Value,
    pub processed_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaymentEventRecord {
    fn from(row: PaymentRow) -> Self {
        PaymentEventRecord {
            event_id: row.event_id,
            event_type: row.event_type,
            payment_intent_id: row.payment_intent_id,
            amount: row.amount,
            currency: row.currency,
            status: row.status,
            created: Timestamp::from_datetime(row.created),
            user_id: row.user_id,
            invoice_id: row.invoice_id,
            metadata: row.metadata,
            processed_at: Timestamp::from_datetime(row.processed_at),
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_super_admin: bool,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| parse_error("role", &row.role))?;
        let id = UserId::new(row.id.to_string())
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        Ok(User {
            id,
            email: row.email,
            role,
            is_super_admin: row.is_super_admin,
            profile: Profile {
                first_name: row.first_name,
                last_name: row.last_name,
                phone: row.phone,
            },
            stripe_customer_id: row.stripe_customer_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Parses a domain user id into the UUID the schema stores.
pub(super) fn user_uuid(user_id: &UserId) -> Result<Uuid, DomainError> {
    Uuid::parse_str(user_id.as_str()).map_err(|e| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("User ID must be a valid UUID: {}", e),
        )
    })
}
