use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::Email,
};

/// In-memory user store for development and tests
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn len(&self) -> usize {
    self.users.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.users.read().await.is_empty()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    // Held across check and insert so two registrations cannot both pass
    let mut users = self.users.write().await;

    if users.values().any(|existing| existing.email == user.email) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        "users_email_key".to_string(),
      )));
    }

    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    Ok(self.users.read().await.get(&id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let users = self.users.read().await;
    Ok(
      users
        .values()
        .find(|user| user.email == email.as_str())
        .cloned(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn user(email: &str) -> User {
    User::from_db(
      Uuid::new_v4(),
      email.to_string(),
      "Ana".to_string(),
      String::new(),
      Utc::now(),
    )
  }

  #[tokio::test]
  async fn test_create_and_find() {
    let repo = InMemoryUserRepository::new();
    assert!(repo.is_empty().await);

    let created = repo.create(user("ana@example.com")).await.unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(by_id.map(|u| u.email), Some("ana@example.com".to_string()));

    let email = Email::new("ana@example.com").unwrap();
    assert!(repo.find_by_email(&email).await.unwrap().is_some());

    let other_case = Email::new("ANA@example.com").unwrap();
    assert!(repo.find_by_email(&other_case).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_duplicate_email_is_rejected() {
    let repo = InMemoryUserRepository::new();
    repo.create(user("ana@example.com")).await.unwrap();

    let result = repo.create(user("ana@example.com")).await;
    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
    assert_eq!(repo.len().await, 1);
  }
}
