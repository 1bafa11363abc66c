//! PostgreSQL implementation of LedgerReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, InvoiceId};
use crate::domain::ledger::{Booking, Invoice, PaymentEventRecord};
use crate::ports::LedgerReader;

use super::rows::{BookingRow, InvoiceRow, PaymentRow};

/// PostgreSQL implementation of the LedgerReader port.
pub struct PostgresLedgerReader {
    pool: PgPool,
}

impl PostgresLedgerReader {
    /// Creates a new reader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerReader for PostgresLedgerReader {
    async fn list_recent_payments(
        &self,
        limit: u32,
    ) -> Result<Vec<PaymentEventRecord>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT event_id, event_type, payment_intent_id, amount, currency, status,
                   created, user_id, invoice_id, metadata, processed_at
            FROM payments
            ORDER BY processed_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list payments: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(PaymentEventRecord::from).collect())
    }

    async fn get_invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
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

    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, client_name, client_email, status, payment_status, payment_method,
                   payment_paid_at, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load booking: {}", e),
            )
        })?;

        row.map(Booking::try_from).transpose()
    }
}
