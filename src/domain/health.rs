use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Connectivity of the backing store as reported by `/health/db`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
  Connected,
  Disconnected,
  /// The pool is still trying to open its first connection
  Connecting,
  /// The pool was closed and connections are draining
  Disconnecting,
  /// The probe failed for a reason unrelated to connectivity
  Unknown,
}

impl DatabaseStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Connected => "connected",
      Self::Disconnected => "disconnected",
      Self::Connecting => "connecting",
      Self::Disconnecting => "disconnecting",
      Self::Unknown => "unknown",
    }
  }

  pub fn is_available(&self) -> bool {
    matches!(self, Self::Connected)
  }
}

impl fmt::Display for DatabaseStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Probe for the store behind the repositories
#[async_trait]
pub trait StoreHealth: Send + Sync {
  /// Current connectivity; never fails, an unreachable store is not `Connected`
  async fn status(&self) -> DatabaseStatus;
}
