use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::PublicUser;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Response containing current user information
#[derive(Debug, Clone)]
pub struct GetCurrentUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  /// Name shown on the dashboard
  pub name: String,
  /// User's email address
  pub email: String,
  /// Timestamp when the user account was created
  pub created_at: DateTime<Utc>,
}

impl GetCurrentUserResponse {
  pub fn public_profile(&self) -> PublicUser {
    PublicUser {
      id: self.user_id,
      name: self.name.clone(),
      email: self.email.clone(),
    }
  }
}

/// Use case for getting the current authenticated user
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the get current user use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` for a malformed, forged or expired
  /// token, or when the account behind it is gone
  pub async fn execute(&self, session_token: String) -> Result<GetCurrentUserResponse, AuthError> {
    let token = SessionToken::parse(session_token).map_err(|_| AuthError::InvalidSession)?;

    let user = self.auth_service.validate_session(&token).await?;

    Ok(GetCurrentUserResponse {
      user_id: user.id,
      name: user.name,
      email: user.email,
      created_at: user.created_at,
    })
  }
}
