//! PostgreSQL implementation of InvoiceRepository.
//!
//! `apply_payment` performs the settlement arithmetic inside a single
//! UPDATE so concurrent settlements for the same invoice serialize on the
//! row instead of racing a read-modify-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, InvoiceId, Timestamp};
use crate::domain::ledger::{
    Invoice, InvoicePayment, InvoiceStatus, PaymentMethod, PaymentStatus,
};
use crate::domain::payments::Settlement;
use crate::ports::{AppliedSettlement, InvoiceRepository};

use super::rows::{parse_error, InvoiceRow};

/// PostgreSQL implementation of the InvoiceRepository port.
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SettledRow {
    booking_id: Option<Uuid>,
    amount_paid: i64,
    balance_due: i64,
    status: String,
    payment_paid_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT id, booking_id, client_name, total, amount_paid, balance_due, status,
                   payment_status, payment_method, payment_paid_at, payment_transaction_id,
                   created_at, updated_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load invoice: {}", e),
            )
        })?;

        row.map(Invoice::try_from).transpose()
    }

    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, booking_id, client_name, total, amount_paid, balance_due, status,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.booking_id.as_ref().map(|b| *b.as_uuid()))
        .bind(&invoice.client_name)
        .bind(invoice.total)
        .bind(invoice.amount_paid)
        .bind(invoice.balance_due)
        .bind(invoice.status.as_str())
        .bind(invoice.created_at.as_datetime())
        .bind(invoice.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save invoice: {}", e),
            )
        })?;

        Ok(())
    }

    async fn apply_payment(
        &self,
        id: &InvoiceId,
        amount: i64,
        transaction_id: &str,
        paid_at: Timestamp,
    ) -> Result<Option<AppliedSettlement>, DomainError> {
        let row: Option<SettledRow> = sqlx::query_as(
            r#"
            UPDATE invoices SET
                amount_paid = amount_paid + $2,
                balance_due = GREATEST(total - (amount_paid + $2), 0),
                status = CASE
                    WHEN total - (amount_paid + $2) <= 0 THEN 'paid'
                    ELSE 'partial'
                END,
                payment_status = CASE
                    WHEN total - (amount_paid + $2) <= 0 THEN 'paid_in_full'
                    ELSE 'partial'
                END,
                payment_method = 'stripe',
                payment_paid_at = $4,
                payment_transaction_id = $3,
                updated_at = $4
            WHERE id = $1
            RETURNING booking_id, amount_paid, balance_due, status, payment_paid_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(amount)
        .bind(transaction_id)
        .bind(paid_at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to apply payment: {}", e),
            )
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status = InvoiceStatus::parse(&row.status)
            .ok_or_else(|| parse_error("invoice status", &row.status))?;

        let settlement = Settlement {
            amount_paid: row.amount_paid,
            balance_due: row.balance_due,
            status,
            payment: InvoicePayment {
                status: if status == InvoiceStatus::Paid {
                    PaymentStatus::PaidInFull
                } else {
                    PaymentStatus::Partial
                },
                method: PaymentMethod::Stripe,
                paid_at: row
                    .payment_paid_at
                    .map(Timestamp::from_datetime)
                    .unwrap_or(paid_at),
                transaction_id: transaction_id.to_string(),
            },
        };

        Ok(Some(AppliedSettlement {
            invoice_id: *id,
            booking_id: row.booking_id.map(BookingId::from_uuid),
            settlement,
        }))
    }
}
