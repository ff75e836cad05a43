use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::entities::PublicUser;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{ClientContext, Email, Password};

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  /// Public fields of the account
  pub user: PublicUser,
  /// Signed session artifact
  pub session_token: String,
  /// Session expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCredentials` for an unknown email or a wrong
  /// password, without saying which
  pub async fn execute(
    &self,
    command: LoginUserCommand,
    context: ClientContext,
  ) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::for_verification(command.password)?;

    let (user, session) = self.auth_service.login(email, password, &context).await?;

    Ok(LoginUserResponse {
      user: user.public_profile(),
      session_token: session.token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
