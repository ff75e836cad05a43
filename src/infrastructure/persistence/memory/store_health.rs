use async_trait::async_trait;

use crate::domain::health::{DatabaseStatus, StoreHealth};

/// Process memory is always reachable
pub struct InMemoryStoreHealth;

#[async_trait]
impl StoreHealth for InMemoryStoreHealth {
  async fn status(&self) -> DatabaseStatus {
    DatabaseStatus::Connected
  }
}
