//! PostgreSQL implementation of SettlementRetryQueue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, InvoiceId, Timestamp};
use crate::ports::{SettlementRetry, SettlementRetryQueue};

/// PostgreSQL implementation of the SettlementRetryQueue port.
pub struct PostgresSettlementRetryQueue {
    pool: PgPool,
}

impl PostgresSettlementRetryQueue {
    /// Creates a new queue with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RetryRow {
    event_id: String,
    invoice_id: Uuid,
    amount: i64,
    transaction_id: String,
    error: String,
    enqueued_at: DateTime<Utc>,
}

impl From<RetryRow> for SettlementRetry {
    fn from(row: RetryRow) -> Self {
        SettlementRetry {
            event_id: row.event_id,
            invoice_id: InvoiceId::from_uuid(row.invoice_id),
            amount: row.amount,
            transaction_id: row.transaction_id,
            error: row.error,
            enqueued_at: Timestamp::from_datetime(row.enqueued_at),
        }
    }
}

#[async_trait]
impl SettlementRetryQueue for PostgresSettlementRetryQueue {
    async fn enqueue(&self, retry: SettlementRetry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO settlement_retries (
                event_id, invoice_id, amount, transaction_id, error, enqueued_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&retry.event_id)
        .bind(retry.invoice_id.as_uuid())
        .bind(retry.amount)
        .bind(&retry.transaction_id)
        .bind(&retry.error)
        .bind(retry.enqueued_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to enqueue settlement retry: {}", e),
            )
        })?;

        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<SettlementRetry>, DomainError> {
        let rows: Vec<RetryRow> = sqlx::query_as(
            r#"
            SELECT event_id, invoice_id, amount, transaction_id, error, enqueued_at
            FROM settlement_retries
            ORDER BY enqueued_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list settlement retries: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(SettlementRetry::from).collect())
    }
}
