use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{IssuedSession, LoginAttempt, SessionClaims, User};
use super::errors::{AuthError, TokenError};
use super::value_objects::{Email, Password, PasswordHash, SessionToken};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository.
  ///
  /// Returns `RepositoryError::DuplicateKey` when the email is already taken.
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address (exact match)
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;
}

/// Append-only store for the authentication audit trail
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync {
  /// Records a new login or registration attempt
  async fn create(&self, attempt: LoginAttempt) -> Result<LoginAttempt, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Signs and checks stateless session artifacts
pub trait SessionIssuer: Send + Sync {
  /// Signs a new session for the user
  fn issue(&self, user: &User) -> Result<IssuedSession, TokenError>;

  /// Checks signature and expiry and returns the claims
  fn verify(&self, token: &SessionToken) -> Result<SessionClaims, TokenError>;
}
