//! PostgreSQL implementation of BookingRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode};
use crate::domain::ledger::Booking;
use crate::ports::BookingRepository;

use super::rows::BookingRow;

/// PostgreSQL implementation of the BookingRepository port.
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
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

    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, client_name, client_email, status, payment_status, payment_method,
                payment_paid_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(&booking.client_name)
        .bind(&booking.client_email)
        .bind(booking.status.as_str())
        .bind(booking.payment.status.as_str())
        .bind(booking.payment.method.map(|m| m.as_str()))
        .bind(booking.payment.paid_at.map(|t| *t.as_datetime()))
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save booking: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2,
                payment_status = $3,
                payment_method = $4,
                payment_paid_at = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.payment.status.as_str())
        .bind(booking.payment.method.map(|m| m.as_str()))
        .bind(booking.payment.paid_at.map(|t| *t.as_datetime()))
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update booking: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::BookingNotFound,
                "Booking not found",
            ));
        }

        Ok(())
    }
}
