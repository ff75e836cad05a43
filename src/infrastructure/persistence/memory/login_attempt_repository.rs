use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::{
  entities::LoginAttempt, errors::AuthError, ports::LoginAttemptRepository,
};

/// Append-only audit log kept in process memory
#[derive(Default)]
pub struct InMemoryLoginAttemptRepository {
  attempts: RwLock<Vec<LoginAttempt>>,
}

impl InMemoryLoginAttemptRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of every recorded attempt in insertion order
  pub async fn all(&self) -> Vec<LoginAttempt> {
    self.attempts.read().await.clone()
  }

  pub async fn len(&self) -> usize {
    self.attempts.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.attempts.read().await.is_empty()
  }
}

#[async_trait]
impl LoginAttemptRepository for InMemoryLoginAttemptRepository {
  async fn create(&self, attempt: LoginAttempt) -> Result<LoginAttempt, AuthError> {
    self.attempts.write().await.push(attempt.clone());
    Ok(attempt)
  }
}
