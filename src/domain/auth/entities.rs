use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

use super::value_objects::{
  ClientContext, DisplayName, Email, FailureReason, PasswordHash, SessionToken,
};

/// User entity representing a registered account
#[derive(Clone)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  /// User's email address (unique, case-sensitive)
  pub email: String,
  /// Name shown on the dashboard
  pub name: String,
  /// Argon2id PHC string
  pub password_hash: String,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Creates a new user with the given details
  pub fn new(email: Email, name: DisplayName, password_hash: PasswordHash) -> Self {
    Self {
      id: Uuid::new_v4(),
      email: email.into_inner(),
      name: name.into_inner(),
      password_hash: password_hash.into_inner(),
      created_at: Utc::now(),
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      name,
      password_hash,
      created_at,
    }
  }

  /// Fields that may leave the service
  pub fn public_profile(&self) -> PublicUser {
    PublicUser {
      id: self.id,
      name: self.name.clone(),
      email: self.email.clone(),
    }
  }
}

// The hash stays out of logs
impl fmt::Debug for User {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("User")
      .field("id", &self.id)
      .field("email", &self.email)
      .field("name", &self.name)
      .field("created_at", &self.created_at)
      .finish_non_exhaustive()
  }
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
  pub id: Uuid,
  pub name: String,
  pub email: String,
}

/// Verified contents of a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
  /// Subject of the token
  pub user_id: Uuid,
  /// Email at the time of issuance
  pub email: String,
  pub issued_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

/// A freshly signed session artifact
#[derive(Debug, Clone)]
pub struct IssuedSession {
  pub token: SessionToken,
  pub expires_at: DateTime<Utc>,
}

/// Audit record of a single login or registration attempt.
///
/// Records are append-only; nothing in the service updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
  /// Unique identifier for the attempt
  pub id: Uuid,
  /// Email address used in the attempt
  pub email: String,
  /// IP address of the client, when known
  pub ip_address: Option<IpAddr>,
  /// User-Agent header of the client
  pub user_agent: String,
  /// Whether the attempt was successful
  pub success: bool,
  /// Precise internal reason for a failed attempt
  pub failure_reason: Option<FailureReason>,
  /// Account the attempt resolved to, if any
  pub user_id: Option<Uuid>,
  /// Timestamp when the attempt was made
  pub attempted_at: DateTime<Utc>,
}

impl LoginAttempt {
  /// Creates a successful attempt for a known user
  pub fn succeeded(email: impl Into<String>, user_id: Uuid, context: &ClientContext) -> Self {
    Self {
      id: Uuid::new_v4(),
      email: email.into(),
      ip_address: context.ip_address,
      user_agent: context.user_agent.clone(),
      success: true,
      failure_reason: None,
      user_id: Some(user_id),
      attempted_at: Utc::now(),
    }
  }

  /// Creates a failed attempt with its internal reason
  pub fn failed(
    email: impl Into<String>,
    reason: FailureReason,
    user_id: Option<Uuid>,
    context: &ClientContext,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      email: email.into(),
      ip_address: context.ip_address,
      user_agent: context.user_agent.clone(),
      success: false,
      failure_reason: Some(reason),
      user_id,
      attempted_at: Utc::now(),
    }
  }

  /// Creates an attempt from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: Uuid,
    email: String,
    ip_address: Option<IpAddr>,
    user_agent: String,
    success: bool,
    failure_reason: Option<FailureReason>,
    user_id: Option<Uuid>,
    attempted_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      ip_address,
      user_agent,
      success,
      failure_reason,
      user_id,
      attempted_at,
    }
  }

  /// Checks if this attempt was a failure
  pub fn is_failure(&self) -> bool {
    !self.success
  }
}
