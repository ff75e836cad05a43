use std::sync::Arc;

use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case for logging out a user
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user logout use case.
  ///
  /// Infallible: a missing or broken token still results in a logout.
  pub fn execute(&self, session_token: Option<String>) {
    let token = session_token.and_then(|t| SessionToken::parse(t).ok());
    self.auth_service.logout(token.as_ref());
  }
}
