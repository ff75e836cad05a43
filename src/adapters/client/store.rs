use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::errors::ClientError;
use crate::domain::auth::entities::PublicUser;

/// Where the client keeps the profile of the signed-in user.
///
/// The session token itself lives in the HTTP cookie jar and never reaches a
/// store.
#[async_trait]
pub trait SessionStore: Send + Sync {
  async fn load(&self) -> Result<Option<PublicUser>, ClientError>;

  async fn save(&self, user: &PublicUser) -> Result<(), ClientError>;

  async fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
  user: RwLock<Option<PublicUser>>,
}

impl InMemorySessionStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
  async fn load(&self) -> Result<Option<PublicUser>, ClientError> {
    Ok(self.user.read().await.clone())
  }

  async fn save(&self, user: &PublicUser) -> Result<(), ClientError> {
    *self.user.write().await = Some(user.clone());
    Ok(())
  }

  async fn clear(&self) -> Result<(), ClientError> {
    *self.user.write().await = None;
    Ok(())
  }
}

/// Profile persisted as a JSON file, surviving restarts of the client
pub struct FileSessionStore {
  path: PathBuf,
}

impl FileSessionStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait]
impl SessionStore for FileSessionStore {
  async fn load(&self) -> Result<Option<PublicUser>, ClientError> {
    match tokio::fs::read(&self.path).await {
      Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn save(&self, user: &PublicUser) -> Result<(), ClientError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(user)?;
    tokio::fs::write(&self.path, bytes).await?;
    Ok(())
  }

  async fn clear(&self) -> Result<(), ClientError> {
    match tokio::fs::remove_file(&self.path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}
