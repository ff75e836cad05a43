use std::sync::Arc;
use tokio::sync::OnceCell;

use super::entities::{IssuedSession, LoginAttempt, User};
use super::errors::{AuthError, HashError, RepositoryError};
use super::ports::{LoginAttemptRepository, PasswordHasher, SessionIssuer, UserRepository};
use super::value_objects::{
  ClientContext, DisplayName, Email, FailureReason, Password, PasswordHash, SessionToken,
};

/// Plaintext behind the hash verified for unknown emails
const TIMING_PLACEHOLDER: &str = "unknown-account-placeholder";

/// Authentication service implementing core business logic
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  attempt_repo: Arc<dyn LoginAttemptRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  session_issuer: Arc<dyn SessionIssuer>,
  placeholder_hash: OnceCell<PasswordHash>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    attempt_repo: Arc<dyn LoginAttemptRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    session_issuer: Arc<dyn SessionIssuer>,
  ) -> Self {
    Self {
      user_repo,
      attempt_repo,
      password_hasher,
      session_issuer,
      placeholder_hash: OnceCell::new(),
    }
  }

  /// Registers a new user and signs them in
  ///
  /// Every call leaves exactly one audit record, successful or not.
  ///
  /// # Errors
  /// Returns `AuthError::EmailAlreadyExists` if the email is already registered
  pub async fn register(
    &self,
    name: DisplayName,
    email: Email,
    password: Password,
    context: &ClientContext,
  ) -> Result<(User, IssuedSession), AuthError> {
    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(self.reject_duplicate_registration(&email, context).await);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let user = User::new(email.clone(), name, password_hash);

    // A concurrent registration can still win the race against the check above
    let created_user = match self.user_repo.create(user).await {
      Ok(user) => user,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(self.reject_duplicate_registration(&email, context).await);
      }
      Err(e) => return Err(e),
    };

    // The account exists from here on, so the attempt is recorded even if signing fails
    self
      .record_attempt(LoginAttempt::succeeded(
        created_user.email.clone(),
        created_user.id,
        context,
      ))
      .await;

    let session = self.session_issuer.issue(&created_user)?;

    tracing::info!(
      user_id = %created_user.id,
      ip = %context.ip_for_log(),
      "New user registered"
    );

    Ok((created_user, session))
  }

  /// Authenticates a user and signs a new session
  ///
  /// Unknown email and wrong password both surface as
  /// `AuthError::InvalidCredentials`; only the audit record tells them apart.
  pub async fn login(
    &self,
    email: Email,
    password: Password,
    context: &ClientContext,
  ) -> Result<(User, IssuedSession), AuthError> {
    let Some(user) = self.user_repo.find_by_email(&email).await? else {
      self.verify_against_placeholder(&password).await;
      self
        .record_attempt(LoginAttempt::failed(
          email.as_str(),
          FailureReason::UserNotFound,
          None,
          context,
        ))
        .await;
      tracing::warn!(
        email = %email,
        ip = %context.ip_for_log(),
        "Login attempt for unknown email"
      );
      return Err(AuthError::InvalidCredentials);
    };

    let stored_hash =
      PasswordHash::from_hash(user.password_hash.as_str()).map_err(|_| HashError::InvalidFormat)?;
    let is_valid = self
      .password_hasher
      .verify(&password, &stored_hash)
      .await?;

    if !is_valid {
      self
        .record_attempt(LoginAttempt::failed(
          email.as_str(),
          FailureReason::InvalidPassword,
          Some(user.id),
          context,
        ))
        .await;
      tracing::warn!(
        email = %email,
        ip = %context.ip_for_log(),
        "Login attempt with wrong password"
      );
      return Err(AuthError::InvalidCredentials);
    }

    self
      .record_attempt(LoginAttempt::succeeded(user.email.clone(), user.id, context))
      .await;

    let session = self.session_issuer.issue(&user)?;

    tracing::info!(user_id = %user.id, ip = %context.ip_for_log(), "Login succeeded");

    Ok((user, session))
  }

  /// Ends a session.
  ///
  /// Sessions are stateless, so there is nothing to revoke here; the caller
  /// only has to make the client drop its artifact. The token, if any, is read
  /// for logging and never causes a failure.
  pub fn logout(&self, token: Option<&SessionToken>) {
    match token.map(|t| self.session_issuer.verify(t)) {
      Some(Ok(claims)) => tracing::info!(user_id = %claims.user_id, "User logged out"),
      Some(Err(e)) => tracing::debug!("Logout with unusable session token: {}", e),
      None => tracing::debug!("Logout without session token"),
    }
  }

  /// Validates a session token and returns the associated user
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if the token is forged, expired, or
  /// belongs to a user that no longer exists
  pub async fn validate_session(&self, token: &SessionToken) -> Result<User, AuthError> {
    let claims = self.session_issuer.verify(token).map_err(|e| {
      tracing::debug!("Rejected session token: {}", e);
      AuthError::InvalidSession
    })?;

    self
      .user_repo
      .find_by_id(claims.user_id)
      .await?
      .ok_or_else(|| {
        tracing::warn!(user_id = %claims.user_id, "Session subject no longer exists");
        AuthError::InvalidSession
      })
  }

  async fn reject_duplicate_registration(
    &self,
    email: &Email,
    context: &ClientContext,
  ) -> AuthError {
    self
      .record_attempt(LoginAttempt::failed(
        email.as_str(),
        FailureReason::EmailAlreadyExists,
        None,
        context,
      ))
      .await;
    tracing::warn!(
      email = %email,
      ip = %context.ip_for_log(),
      "Registration with an existing email"
    );
    AuthError::EmailAlreadyExists
  }

  /// Runs one hash verification so unknown emails cost as much as wrong passwords
  async fn verify_against_placeholder(&self, password: &Password) {
    let placeholder = self
      .placeholder_hash
      .get_or_try_init(|| async {
        let plaintext = Password::for_verification(TIMING_PLACEHOLDER)?;
        self.password_hasher.hash(&plaintext).await
      })
      .await;

    match placeholder {
      Ok(hash) => {
        if let Err(e) = self.password_hasher.verify(password, hash).await {
          tracing::debug!("Placeholder verification failed: {}", e);
        }
      }
      Err(e) => tracing::error!("Failed to prepare placeholder hash: {}", e),
    }
  }

  /// Writes an audit record. Failures are logged and otherwise ignored.
  async fn record_attempt(&self, attempt: LoginAttempt) {
    if let Err(e) = self.attempt_repo.create(attempt).await {
      tracing::error!("Failed to record login attempt: {}", e);
    }
  }
}
