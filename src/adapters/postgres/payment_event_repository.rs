//! PostgreSQL implementation of PaymentEventRepository.
//!
//! The `payments` table's PRIMARY KEY on `event_id` plus
//! `ON CONFLICT DO NOTHING` makes the insert the race-safe dedup marker:
//! under concurrent delivery of the same event, exactly one insert reports
//! a row affected.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::ledger::PaymentEventRecord;
use crate::ports::{PaymentEventRepository, SaveResult};

use super::rows::PaymentRow;

/// PostgreSQL implementation of the PaymentEventRepository port.
pub struct PostgresPaymentEventRepository {
    pool: PgPool,
}

impl PostgresPaymentEventRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentEventRepository for PostgresPaymentEventRepository {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<PaymentEventRecord>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT event_id, event_type, payment_intent_id, amount, currency, status,
                   created, user_id, invoice_id, metadata, processed_at
            FROM payments
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load payment event: {}", e),
            )
        })?;

        Ok(row.map(PaymentEventRecord::from))
    }

    async fn save(&self, record: PaymentEventRecord) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (
                event_id, event_type, payment_intent_id, amount, currency, status,
                created, user_id, invoice_id, metadata, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(&record.event_id)
        .bind(&record.event_type)
        .bind(&record.payment_intent_id)
        .bind(record.amount)
        .bind(&record.currency)
        .bind(&record.status)
        .bind(record.created.as_datetime())
        .bind(&record.user_id)
        .bind(&record.invoice_id)
        .bind(&record.metadata)
        .bind(record.processed_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record payment event: {}", e),
            )
        })?;

        if result.rows_affected() == 1 {
            Ok(SaveResult::Inserted)
        } else {
            Ok(SaveResult::AlreadyExists)
        }
    }
}
