//! ManageAdminsHandler - Command handler for admin role management.
//!
//! Grant/revoke/list sit directly in front of ledger visibility, so the
//! guards here are the access control for the admin ledger surfaces:
//! the caller must hold the super-admin flag, a super admin can never be
//! revoked, and a caller cannot revoke their own access.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::accounts::{Role, User};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::UserRepository;

/// Errors from administrative role management.
#[derive(Debug, Error)]
pub enum AdminGateError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<DomainError> for AdminGateError {
    fn from(err: DomainError) -> Self {
        AdminGateError::Infrastructure(err.to_string())
    }
}

/// Admin user summary for the management listing.
#[derive(Debug, Clone)]
pub struct AdminSummary {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_super_admin: bool,
    pub created_at: Timestamp,
}

impl From<User> for AdminSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.profile.first_name,
            last_name: user.profile.last_name,
            is_super_admin: user.is_super_admin,
            created_at: user.created_at,
        }
    }
}

/// Handler for admin role management.
pub struct ManageAdminsHandler {
    users: Arc<dyn UserRepository>,
}

impl ManageAdminsHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// List all users holding the admin role.
    pub async fn list(&self, caller: &UserId) -> Result<Vec<AdminSummary>, AdminGateError> {
        self.require_super_admin(caller).await?;

        let admins = self.users.list_admins().await?;
        Ok(admins.into_iter().map(AdminSummary::from).collect())
    }

    /// Grant the admin role to the user with the given email.
    pub async fn grant(&self, caller: &UserId, target_email: &str) -> Result<(), AdminGateError> {
        self.require_super_admin(caller).await?;

        if target_email.trim().is_empty() {
            return Err(AdminGateError::InvalidArgument(
                "targetEmail is required".to_string(),
            ));
        }

        let target = self
            .users
            .find_by_email(target_email)
            .await?
            .ok_or_else(|| {
                AdminGateError::NotFound(format!("No user found with email: {}", target_email))
            })?;

        self.users
            .set_role(&target.id, Role::Admin, Timestamp::now())
            .await?;

        tracing::info!(caller = %caller, target = %target.id, "admin role granted");
        Ok(())
    }

    /// Revoke the admin role from the given user.
    pub async fn revoke(&self, caller: &UserId, target: &UserId) -> Result<(), AdminGateError> {
        self.require_super_admin(caller).await?;

        // A super admin can never be demoted through this path.
        if let Some(target_user) = self.users.find_by_id(target).await? {
            if target_user.is_super_admin {
                return Err(AdminGateError::PermissionDenied(
                    "Cannot revoke a super admin".to_string(),
                ));
            }
        }

        if target == caller {
            return Err(AdminGateError::PermissionDenied(
                "You cannot revoke your own admin access".to_string(),
            ));
        }

        self.users
            .set_role(target, Role::Client, Timestamp::now())
            .await?;

        tracing::info!(caller = %caller, target = %target, "admin role revoked");
        Ok(())
    }

    async fn require_super_admin(&self, caller: &UserId) -> Result<User, AdminGateError> {
        let user = self.users.find_by_id(caller).await?.ok_or_else(|| {
            AdminGateError::PermissionDenied(
                "Only super admins can manage admin users".to_string(),
            )
        })?;

        if !user.is_super_admin {
            return Err(AdminGateError::PermissionDenied(
                "Only super admins can manage admin users".to_string(),
            ));
        }

        Ok(user)
    }
}
