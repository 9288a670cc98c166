use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{Role, User};

/// Repository trait for User persistence.
///
/// There is deliberately no delete operation: users are deactivated, never
/// removed. `save` both inserts (id 0) and updates (id assigned), and is
/// the authoritative uniqueness enforcement point — implementations reject
/// a username or email already taken by another user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch all users
    async fn find_all(&self) -> UserResult<Vec<User>>;

    /// Fetch a user by ID
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// Fetch a user by exact email
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Fetch a user by exact username
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// Check whether a user with this email exists
    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;

    /// Check whether a user with this username exists
    async fn exists_by_username(&self, username: &str) -> UserResult<bool>;

    /// Persist a user, assigning an id on first save
    async fn save(&self, user: User) -> UserResult<User>;

    /// Fetch all active users
    async fn find_active(&self) -> UserResult<Vec<User>>;

    /// Fetch all users with the given role
    async fn find_by_role(&self, role: Role) -> UserResult<Vec<User>>;

    /// Case-insensitive substring match against first or last name
    async fn find_by_name_containing(&self, term: &str) -> UserResult<Vec<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut users: Vec<User>) -> Vec<User> {
        users.sort_by_key(|u| u.id);
        users
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(Self::sorted(users.values().cloned().collect()))
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn exists_by_username(&self, username: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn save(&self, mut user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        // Mirror the store-level unique constraints
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::DuplicateEmail(user.email));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(UserError::DuplicateUsername(user.username));
        }

        if user.id == 0 {
            user.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::info!(user_id = %user.id, "Created user");
        } else {
            tracing::info!(user_id = %user.id, "Updated user");
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_active(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(Self::sorted(
            users.values().filter(|u| u.is_active).cloned().collect(),
        ))
    }

    async fn find_by_role(&self, role: Role) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(Self::sorted(
            users.values().filter(|u| u.role == role).cloned().collect(),
        ))
    }

    async fn find_by_name_containing(&self, term: &str) -> UserResult<Vec<User>> {
        let needle = term.to_lowercase();
        let users = self.users.read().await;
        Ok(Self::sorted(
            users
                .values()
                .filter(|u| {
                    u.first_name
                        .as_ref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
                        || u.last_name
                            .as_ref()
                            .is_some_and(|n| n.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;

    fn alice() -> User {
        User::new(CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
            phone: None,
            role: Role::Customer,
            is_active: true,
        })
    }

    #[tokio::test]
    async fn test_save_and_lookups() {
        let repo = InMemoryUserRepository::new();
        let user = repo.save(alice()).await.unwrap();
        assert_eq!(user.id, 1);

        assert!(repo.find_by_id(user.id).await.unwrap().is_some());
        assert!(
            repo.find_by_email("alice@example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(repo.find_by_username("alice").await.unwrap().is_some());
        assert!(repo.exists_by_email("alice@example.com").await.unwrap());
        assert!(!repo.exists_by_email("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(alice()).await.unwrap();

        let mut other = alice();
        other.username = "alice2".to_string();

        let result = repo.save(other).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        repo.save(alice()).await.unwrap();

        let mut other = alice();
        other.email = "alice2@example.com".to_string();

        let result = repo.save(other).await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_save_allows_updating_own_row() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.save(alice()).await.unwrap();

        user.phone = Some("555-0100".to_string());
        let updated = repo.save(user).await.unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_find_by_name_containing_ignores_case() {
        let repo = InMemoryUserRepository::new();
        repo.save(alice()).await.unwrap();

        let found = repo.find_by_name_containing("smi").await.unwrap();
        assert_eq!(found.len(), 1);

        let found = repo.find_by_name_containing("ALI").await.unwrap();
        assert_eq!(found.len(), 1);

        let found = repo.find_by_name_containing("bob").await.unwrap();
        assert!(found.is_empty());
    }
}
