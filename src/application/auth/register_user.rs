use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::entities::PublicUser;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{ClientContext, DisplayName, Email, Password};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// Name shown on the dashboard
  pub name: String,
  /// User's email address
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  /// Public fields of the new account
  pub user: PublicUser,
  /// Signed session artifact for immediate login
  pub session_token: String,
  /// Session expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError` if registration fails (e.g., email already exists, validation errors)
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
    context: ClientContext,
  ) -> Result<RegisterUserResponse, AuthError> {
    let name = DisplayName::new(command.name)?;
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let (user, session) = self
      .auth_service
      .register(name, email, password, &context)
      .await?;

    Ok(RegisterUserResponse {
      user: user.public_profile(),
      session_token: session.token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
