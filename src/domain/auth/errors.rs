use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Email already exists")]
  EmailAlreadyExists,

  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Token error: {0}")]
  Token(#[from] TokenError),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Session token signing and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("Session token has expired")]
  Expired,

  #[error("Session token is invalid: {0}")]
  Invalid(String),

  #[error("Failed to sign session token: {0}")]
  SigningFailed(String),
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
  fn from(error: jsonwebtoken::errors::Error) -> Self {
    use jsonwebtoken::errors::ErrorKind;
    match error.kind() {
      ErrorKind::ExpiredSignature => TokenError::Expired,
      _ => TokenError::Invalid(error.to_string()),
    }
  }
}

impl From<argon2::password_hash::Error> for HashError {
  fn from(error: argon2::password_hash::Error) -> Self {
    use argon2::password_hash::Error;
    match error {
      Error::PhcStringField | Error::PhcStringTrailingData => HashError::InvalidFormat,
      _ => HashError::HashingFailed(error.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_not_found_maps_to_not_found() {
    let error: RepositoryError = sqlx::Error::RowNotFound.into();
    assert!(matches!(error, RepositoryError::NotFound));
  }

  #[test]
  fn test_pool_errors_map_to_connection_failed() {
    let error: AuthError = sqlx::Error::PoolTimedOut.into();
    assert!(matches!(
      error,
      AuthError::Repository(RepositoryError::ConnectionFailed(_))
    ));
  }

  #[test]
  fn test_expired_jwt_maps_to_expired() {
    use jsonwebtoken::errors::{Error, ErrorKind};

    let error = Error::from(ErrorKind::ExpiredSignature);
    assert!(matches!(TokenError::from(error), TokenError::Expired));

    let error = Error::from(ErrorKind::InvalidSignature);
    assert!(matches!(TokenError::from(error), TokenError::Invalid(_)));
  }
}
