use reqwest::{Client, Response, cookie::Jar};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::errors::ClientError;
use super::store::SessionStore;
use crate::adapters::http::dtos::{ErrorResponse, UserEnvelope};
use crate::domain::auth::entities::PublicUser;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// What the user typed into the login or sign-up form
#[derive(Clone, Serialize)]
#[serde(untagged)]
pub enum Credentials {
  Login {
    email: String,
    password: String,
  },
  Register {
    name: String,
    email: String,
    password: String,
  },
}

impl Credentials {
  fn path(&self) -> &'static str {
    match self {
      Credentials::Login { .. } => "/auth/login",
      Credentials::Register { .. } => "/auth/register",
    }
  }
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Credentials::Login { email, .. } => f
        .debug_struct("Login")
        .field("email", email)
        .finish_non_exhaustive(),
      Credentials::Register { name, email, .. } => f
        .debug_struct("Register")
        .field("name", name)
        .field("email", email)
        .finish_non_exhaustive(),
    }
  }
}

/// Dashboard-side view of the credential service.
///
/// The session token travels only as the httpOnly `access_token` cookie held
/// by this client's cookie jar. The store keeps the last known profile so the
/// UI can render without a round trip.
pub struct SessionClient {
  base_url: String,
  timeout: Duration,
  http: RwLock<Client>,
  store: Arc<dyn SessionStore>,
}

impl SessionClient {
  pub fn new(
    base_url: impl Into<String>,
    store: Arc<dyn SessionStore>,
  ) -> Result<Self, ClientError> {
    Self::with_timeout(base_url, store, DEFAULT_TIMEOUT)
  }

  pub fn with_timeout(
    base_url: impl Into<String>,
    store: Arc<dyn SessionStore>,
    timeout: Duration,
  ) -> Result<Self, ClientError> {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    let http = build_http_client(timeout)?;

    Ok(Self {
      base_url,
      timeout,
      http: RwLock::new(http),
      store,
    })
  }

  /// Logs in or registers, then caches the returned profile
  pub async fn authenticate(&self, credentials: Credentials) -> Result<PublicUser, ClientError> {
    let response = self
      .http()
      .post(self.url(credentials.path()))
      .json(&credentials)
      .send()
      .await?;

    let envelope: UserEnvelope = parse_success(response).await?;
    self.store.save(&envelope.user).await?;

    tracing::info!(user_id = %envelope.user.id, "Session established");
    Ok(envelope.user)
  }

  /// Asks the server whether the session cookie is still good.
  ///
  /// A rejected session clears the cached profile. Network trouble leaves the
  /// cache alone and reports `false`.
  pub async fn is_authenticated(&self) -> bool {
    let response = match self.http().get(self.url("/auth/me")).send().await {
      Ok(response) => response,
      Err(e) => {
        tracing::warn!("Session check failed: {}", e);
        return false;
      }
    };

    match parse_success::<UserEnvelope>(response).await {
      Ok(envelope) => {
        if let Err(e) = self.store.save(&envelope.user).await {
          tracing::warn!("Failed to cache profile: {}", e);
        }
        true
      }
      Err(ClientError::Unauthorized) => {
        if let Err(e) = self.store.clear().await {
          tracing::warn!("Failed to clear cached profile: {}", e);
        }
        false
      }
      Err(e) => {
        tracing::warn!("Session check failed: {}", e);
        false
      }
    }
  }

  /// Ends the session locally, telling the server when it can be reached
  pub async fn logout(&self) {
    match self.http().post(self.url("/auth/logout")).send().await {
      Ok(response) if response.status().is_success() => {}
      Ok(response) => tracing::warn!("Logout answered with {}", response.status()),
      Err(e) => tracing::warn!("Logout request failed: {}", e),
    }

    // A fresh jar drops the session cookie even if the server never answered
    match build_http_client(self.timeout) {
      Ok(client) => *self.http.write().unwrap_or_else(|e| e.into_inner()) = client,
      Err(e) => tracing::error!("Failed to reset cookie jar: {}", e),
    }

    if let Err(e) = self.store.clear().await {
      tracing::error!("Failed to clear cached profile: {}", e);
    }
  }

  /// Last profile seen by this client, without contacting the server
  pub async fn current_user(&self) -> Result<Option<PublicUser>, ClientError> {
    self.store.load().await
  }

  fn http(&self) -> Client {
    self.http.read().unwrap_or_else(|e| e.into_inner()).clone()
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }
}

fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
  Client::builder()
    .cookie_provider(Arc::new(Jar::default()))
    .timeout(timeout)
    .build()
}

async fn parse_success<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response.json::<T>().await?);
  }

  let body = response.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorResponse>(&body)
    .map(|error| error.message)
    .unwrap_or(body);

  Err(ClientError::from_status(status, message))
}
