use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::health::{DatabaseStatus, StoreHealth};

/// Reports pool connectivity by running a trivial query
pub struct PostgresStoreHealth {
  pool: PgPool,
}

impl PostgresStoreHealth {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl StoreHealth for PostgresStoreHealth {
  async fn status(&self) -> DatabaseStatus {
    if self.pool.is_closed() {
      return closed_pool_status(self.pool.size());
    }

    match sqlx::query("SELECT 1").execute(&self.pool).await {
      Ok(_) => DatabaseStatus::Connected,
      Err(e) => {
        tracing::warn!("Database health probe failed: {}", e);
        probe_error_status(&e, self.pool.size())
      }
    }
  }
}

fn closed_pool_status(open_connections: u32) -> DatabaseStatus {
  if open_connections > 0 {
    DatabaseStatus::Disconnecting
  } else {
    DatabaseStatus::Disconnected
  }
}

fn probe_error_status(error: &sqlx::Error, open_connections: u32) -> DatabaseStatus {
  match error {
    // Acquire keeps retrying the connect until it times out
    sqlx::Error::PoolTimedOut if open_connections == 0 => DatabaseStatus::Connecting,
    sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
      DatabaseStatus::Disconnected
    }
    sqlx::Error::PoolClosed => closed_pool_status(open_connections),
    _ => DatabaseStatus::Unknown,
  }
}
