use chrono::Utc;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, Role, UpdateUser, User};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List all users
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    /// Get a user by ID; absence is a normal outcome, not an error
    pub async fn get_user(&self, id: i64) -> UserResult<Option<User>> {
        self.repository.find_by_id(id).await
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.repository.find_by_email(email).await
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> UserResult<Option<User>> {
        self.repository.find_by_username(username).await
    }

    /// Create a new user.
    ///
    /// Email uniqueness is checked before username; caller-supplied role
    /// and activation state are always overwritten with `CUSTOMER` / active.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        if self.repository.exists_by_email(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }
        if self.repository.exists_by_username(&input.username).await? {
            return Err(UserError::DuplicateUsername(input.username));
        }

        self.repository.save(User::new(input)).await
    }

    /// Update a user's profile fields.
    ///
    /// Duplicate checks only fire for fields that actually change; the
    /// password is not touched by this operation.
    pub async fn update_user(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if user.email != input.email && self.repository.exists_by_email(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        if user.username != input.username
            && self.repository.exists_by_username(&input.username).await?
        {
            return Err(UserError::DuplicateUsername(input.username));
        }

        user.apply_update(input);

        self.repository.save(user).await
    }

    /// Deactivate a user
    pub async fn deactivate_user(&self, id: i64) -> UserResult<User> {
        self.set_active(id, false).await
    }

    /// Activate a user
    pub async fn activate_user(&self, id: i64) -> UserResult<User> {
        self.set_active(id, true).await
    }

    async fn set_active(&self, id: i64, is_active: bool) -> UserResult<User> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user.is_active = is_active;
        user.updated_at = Utc::now();

        self.repository.save(user).await
    }

    /// Overwrite a user's password; a blank password is rejected
    pub async fn change_password(&self, id: i64, new_password: &str) -> UserResult<User> {
        if new_password.trim().is_empty() {
            return Err(UserError::InvalidInput("Password is required".to_string()));
        }

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user.password = new_password.to_string();
        user.updated_at = Utc::now();

        self.repository.save(user).await
    }

    /// List all active users
    pub async fn list_active_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_active().await
    }

    /// List users with the given role
    pub async fn list_users_by_role(&self, role: Role) -> UserResult<Vec<User>> {
        self.repository.find_by_role(role).await
    }

    /// Search users by first or last name.
    ///
    /// A blank or absent name deliberately yields an empty result, not the
    /// full user list.
    pub async fn search_users_by_name(&self, name: Option<&str>) -> UserResult<Vec<User>> {
        let term = match name {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => return Ok(Vec::new()),
        };

        self.repository.find_by_name_containing(term).await
    }

    /// Check whether a user with this email exists
    pub async fn email_exists(&self, email: &str) -> UserResult<bool> {
        self.repository.exists_by_email(email).await
    }

    /// Check whether a user with this username exists
    pub async fn username_exists(&self, username: &str) -> UserResult<bool> {
        self.repository.exists_by_username(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};

    fn create_input(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
            phone: None,
            role: Role::Customer,
            is_active: true,
        }
    }

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new())
    }

    #[tokio::test]
    async fn test_create_forces_customer_role_and_active() {
        let service = service();

        let mut input = create_input("alice", "alice@example.com");
        // Caller tries to smuggle in elevated state
        input.role = Role::Admin;
        input.is_active = false;

        let user = service.create_user(input).await.unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(user.is_active);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email_first() {
        let service = service();
        service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        // Same email and username taken: the email check fires first
        let result = service
            .create_user(create_input("alice", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));

        // Different username, same email
        let result = service
            .create_user(create_input("alice2", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));

        // Same username, different email
        let result = service
            .create_user(create_input("alice", "alice2@example.com"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_update_overwrites_profile_but_not_password() {
        let service = service();
        let user = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateUser {
                    username: "alice".to_string(),
                    email: "alice@example.com".to_string(),
                    first_name: Some("Alicia".to_string()),
                    last_name: None,
                    phone: Some("555-0100".to_string()),
                    role: Role::Manager,
                    is_active: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Alicia"));
        assert_eq!(updated.last_name, None);
        assert_eq!(updated.role, Role::Manager);
        assert!(!updated.is_active);
        assert_eq!(updated.password, "secret");
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_update_unchanged_fields_skip_duplicate_checks() {
        // Mock repository verifies the existence checks are never issued
        // when email and username are unchanged
        let mut repo = MockUserRepository::new();
        let mut existing = User::new(create_input("alice", "alice@example.com"));
        existing.id = 1;

        let stored = existing.clone();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_exists_by_email().times(0);
        repo.expect_exists_by_username().times(0);
        repo.expect_save().returning(Ok);

        let service = UserService::new(repo);
        let updated = service
            .update_user(
                1,
                UpdateUser {
                    username: "alice".to_string(),
                    email: "alice@example.com".to_string(),
                    first_name: Some("Alicia".to_string()),
                    last_name: Some("Smith".to_string()),
                    phone: None,
                    role: Role::Customer,
                    is_active: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Alicia"));
    }

    #[tokio::test]
    async fn test_update_changed_email_conflicts() {
        let service = service();
        service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();
        let bob = service
            .create_user(create_input("bob", "bob@example.com"))
            .await
            .unwrap();

        let result = service
            .update_user(
                bob.id,
                UpdateUser {
                    username: "bob".to_string(),
                    email: "alice@example.com".to_string(),
                    first_name: None,
                    last_name: None,
                    phone: None,
                    role: Role::Customer,
                    is_active: true,
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = service();
        let result = service
            .update_user(
                99,
                UpdateUser {
                    username: "ghost".to_string(),
                    email: "ghost@example.com".to_string(),
                    first_name: None,
                    last_name: None,
                    phone: None,
                    role: Role::Customer,
                    is_active: true,
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_activation_lifecycle() {
        let service = service();
        let user = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        let deactivated = service.deactivate_user(user.id).await.unwrap();
        assert!(!deactivated.is_active);

        let active = service.list_active_users().await.unwrap();
        assert!(active.is_empty());

        let reactivated = service.activate_user(user.id).await.unwrap();
        assert!(reactivated.is_active);
        assert!(reactivated.updated_at >= deactivated.updated_at);

        let result = service.deactivate_user(404).await;
        assert!(matches!(result, Err(UserError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = service();
        let user = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        let updated = service.change_password(user.id, "hunter2").await.unwrap();
        assert_eq!(updated.password, "hunter2");

        let result = service.change_password(user.id, "   ").await;
        assert!(matches!(result, Err(UserError::InvalidInput(_))));

        let result = service.change_password(99, "hunter2").await;
        assert!(matches!(result, Err(UserError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_search_by_name_blank_is_empty() {
        let service = service();
        service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(service.search_users_by_name(None).await.unwrap().is_empty());
        assert!(
            service
                .search_users_by_name(Some("  "))
                .await
                .unwrap()
                .is_empty()
        );

        let found = service.search_users_by_name(Some("smi")).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let service = service();
        let alice = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();
        service
            .create_user(create_input("bob", "bob@example.com"))
            .await
            .unwrap();

        // Promote alice through update
        service
            .update_user(
                alice.id,
                UpdateUser {
                    username: "alice".to_string(),
                    email: "alice@example.com".to_string(),
                    first_name: None,
                    last_name: None,
                    phone: None,
                    role: Role::Admin,
                    is_active: true,
                },
            )
            .await
            .unwrap();

        let admins = service.list_users_by_role(Role::Admin).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].username, "alice");

        let customers = service.list_users_by_role(Role::Customer).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].username, "bob");
    }

    #[tokio::test]
    async fn test_existence_checks() {
        let service = service();
        service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(service.email_exists("alice@example.com").await.unwrap());
        assert!(!service.email_exists("bob@example.com").await.unwrap());
        assert!(service.username_exists("alice").await.unwrap());
        assert!(!service.username_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_store_duplicate_rejection_maps_to_same_outcome() {
        // Even when the pre-check passes (lost race), the store's constraint
        // rejection surfaces as the same DuplicateEmail outcome
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(false));
        repo.expect_exists_by_username().returning(|_| Ok(false));
        repo.expect_save()
            .returning(|user| Err(UserError::DuplicateEmail(user.email)));

        let service = UserService::new(repo);
        let result = service
            .create_user(create_input("alice", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }
}
