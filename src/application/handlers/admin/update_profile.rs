//! UpdateProfileHandler - Command handler for self-service profile edits.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::{ProfileUpdate, UserRepository};

/// Command to update the authenticated user's own profile.
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub update: ProfileUpdate,
}

/// Handler for profile updates.
pub struct UpdateProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<(), DomainError> {
        if cmd.update.is_empty() {
            return Err(DomainError::validation(
                "update",
                "At least one profile field is required",
            ));
        }

        if let Some(email) = &cmd.update.new_email {
            let email = email.trim();
            if email.is_empty() || !email.contains('@') {
                return Err(DomainError::validation("newEmail", "Invalid email address"));
            }
        }

        self.users
            .update_profile(&cmd.user_id, cmd.update, Timestamp::now())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::accounts::{Role, User};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockUserRepository {
        updates: Mutex<Vec<(UserId, ProfileUpdate)>>,
    }

    impl MockUserRepository {
        fn new() -> Self {
            Self {
                updates: Mutex::new(Vec::new()),
            }
        }

        fn update_count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn claim_customer_ref(
            &self,
            _id: &UserId,
            _email: &str,
            customer_id: &str,
        ) -> Result<String, DomainError> {
            Ok(customer_id.to_string())
        }

        async fn set_role(
            &self,
            _id: &UserId,
            _role: Role,
            _now: Timestamp,
        ) -> Result<(), DomainError> {
            Ok(())
        }

        async fn list_admins(&self) -> Result<Vec<User>, DomainError> {
            Ok(vec![])
        }

        async fn update_profile(
            &self,
            id: &UserId,
            update: ProfileUpdate,
            _now: Timestamp,
        ) -> Result<(), DomainError> {
            self.updates.lock().unwrap().push((id.clone(), update));
            Ok(())
        }
    }

    fn cmd(update: ProfileUpdate) -> UpdateProfileCommand {
        UpdateProfileCommand {
            user_id: UserId::new("user-1").unwrap(),
            update,
        }
    }

    #[tokio::test]
    async fn name_update_is_applied() {
        let repo = Arc::new(MockUserRepository::new());
        let handler = UpdateProfileHandler::new(repo.clone());

        handler
            .handle(cmd(ProfileUpdate {
                first_name: Some("Jamie".to_string()),
                last_name: Some("Lee".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(repo.update_count(), 1);
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let repo = Arc::new(MockUserRepository::new());
        let handler = UpdateProfileHandler::new(repo.clone());

        let result = handler.handle(cmd(ProfileUpdate::default())).await;

        assert!(result.is_err());
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let repo = Arc::new(MockUserRepository::new());
        let handler = UpdateProfileHandler::new(repo.clone());

        let result = handler
            .handle(cmd(ProfileUpdate {
                new_email: Some("not-an-email".to_string()),
                ..Default::default()
            }))
            .await;

        assert!(result.is_err());
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn valid_email_change_is_applied() {
        let repo = Arc::new(MockUserRepository::new());
        let handler = UpdateProfileHandler::new(repo.clone());

        handler
            .handle(cmd(ProfileUpdate {
                new_email: Some("new@example.com".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(repo.update_count(), 1);
    }
}
