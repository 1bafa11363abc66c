//! PostgreSQL implementation of UserRepository.
//!
//! The Customer Reference claim is a single upsert with a COALESCE guard,
//! so two concurrent first-time charges converge on one stored reference
//! without a read-then-write window.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::accounts::{Role, User};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{ProfileUpdate, UserRepository};

use super::rows::{user_uuid, UserRow};

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, email, role, is_super_admin, first_name, last_name, phone, \
                            stripe_customer_id, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let uuid = user_uuid(id)?;

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load user: {}", e),
            )
        })?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load user by email: {}", e),
            )
        })?;

        row.map(User::try_from).transpose()
    }

    async fn claim_customer_ref(
        &self,
        id: &UserId,
        email: &str,
        customer_id: &str,
    ) -> Result<String, DomainError> {
        let uuid = user_uuid(id)?;

        // First writer wins; everyone gets the stored value back.
        let stored: String = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, email, stripe_customer_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                stripe_customer_id = COALESCE(users.stripe_customer_id, EXCLUDED.stripe_customer_id),
                updated_at = now()
            RETURNING stripe_customer_id
            "#,
        )
        .bind(uuid)
        .bind(email)
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to claim customer reference: {}", e),
            )
        })?;

        Ok(stored)
    }

    async fn set_role(&self, id: &UserId, role: Role, now: Timestamp) -> Result<(), DomainError> {
        let uuid = user_uuid(id)?;

        let result = sqlx::query(
            r#"
            UPDATE users SET role = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(uuid)
        .bind(role.as_str())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to set role: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }

    async fn list_admins(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE role = 'admin' ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list admins: {}", e),
            )
        })?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let uuid = user_uuid(id)?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(uuid)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone)
        .bind(&update.new_email)
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update profile: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }
}
