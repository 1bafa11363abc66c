//! UserRepository port - user records, roles, and customer references.

use async_trait::async_trait;

use crate::domain::accounts::{Role, User};
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub new_email: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update carries any change at all.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.new_email.is_none()
    }
}

/// Port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Atomically claim the Customer Reference for a user.
    ///
    /// Sets `stripe_customer_id` only if none is stored yet and returns the
    /// stored value either way. Two concurrent first-time charges therefore
    /// converge on one reference: the loser of the race gets the winner's id
    /// back and its freshly-created processor customer is orphaned (logged
    /// by the caller). Creates the user row if it does not exist yet.
    async fn claim_customer_ref(
        &self,
        id: &UserId,
        email: &str,
        customer_id: &str,
    ) -> Result<String, DomainError>;

    /// Set a user's role.
    async fn set_role(&self, id: &UserId, role: Role, now: Timestamp) -> Result<(), DomainError>;

    /// List all users holding the admin role.
    async fn list_admins(&self) -> Result<Vec<User>, DomainError>;

    /// Apply a profile update to a user.
    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
        now: Timestamp,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn UserRepository) {}
    }

    #[test]
    fn empty_profile_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
