use argon2::PasswordHash as Argon2PasswordHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;
use validator::ValidateEmail;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Name must be between 1 and {max} characters")]
  InvalidName { max: usize },

  #[error("Password is too short (minimum {min} characters)")]
  PasswordTooShort { min: usize },

  #[error("Password is too long (maximum {max} characters)")]
  PasswordTooLong { max: usize },

  #[error("Password is required")]
  PasswordMissing,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Invalid session token format")]
  InvalidToken,

  #[error("Unknown failure reason: {0}")]
  UnknownFailureReason(String),
}

// ============================================================================
// Email Value Object
// ============================================================================

/// Email address exactly as the user typed it.
///
/// Lookups and the uniqueness check are case-sensitive, so no normalization
/// beyond trimming surrounding whitespace is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into().trim().to_string();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    Ok(Self(email))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// DisplayName Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
  const MAX_LENGTH: usize = 100;

  pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
    let name = name.into().trim().to_string();
    let length = name.chars().count();

    if length == 0 || length > Self::MAX_LENGTH {
      return Err(ValueObjectError::InvalidName {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for DisplayName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Plain-text password. The buffer is wiped when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  pub const MIN_LENGTH: usize = 8;
  pub const MAX_LENGTH: usize = 128;

  /// Creates a password for a new account, enforcing the length policy
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = password.into();
    let length = password.chars().count();

    if length < Self::MIN_LENGTH {
      return Err(ValueObjectError::PasswordTooShort {
        min: Self::MIN_LENGTH,
      });
    }

    if length > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(password))
  }

  /// Creates a password that is only going to be checked against a stored hash.
  ///
  /// No minimum length applies here: a too-short password at login is simply
  /// a wrong password and must be handled as one.
  pub fn for_verification(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = password.into();

    if password.is_empty() {
      return Err(ValueObjectError::PasswordMissing);
    }

    if password.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a new PasswordHash from an existing PHC hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PasswordHash(***)")
  }
}

// ============================================================================
// SessionToken Value Object (Signed Session Artifact)
// ============================================================================

/// Signed, self-contained session artifact handed to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
  /// Wraps a token received from a client.
  ///
  /// Only the shape is checked here (three non-empty dot-separated segments);
  /// signature and expiry are checked by the session issuer.
  pub fn parse(token: impl Into<String>) -> Result<Self, ValueObjectError> {
    let token = token.into();
    let segments: Vec<&str> = token.split('.').collect();

    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(token))
  }

  /// Wraps a token that was just signed by this service
  pub fn from_signed(token: String) -> Self {
    Self(token)
  }

  /// Returns the token as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

// Implement Debug without exposing the token
impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(***)")
  }
}

// ============================================================================
// ClientContext
// ============================================================================

/// Where an authentication attempt came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
  pub ip_address: Option<IpAddr>,
  pub user_agent: String,
}

impl ClientContext {
  pub const UNKNOWN_USER_AGENT: &'static str = "Unknown";

  pub fn new(ip_address: Option<IpAddr>, user_agent: Option<String>) -> Self {
    Self {
      ip_address,
      user_agent: user_agent
        .filter(|ua| !ua.trim().is_empty())
        .unwrap_or_else(|| Self::UNKNOWN_USER_AGENT.to_string()),
    }
  }

  /// IP address rendered for log lines
  pub fn ip_for_log(&self) -> String {
    self
      .ip_address
      .map(|ip| ip.to_string())
      .unwrap_or_else(|| "unknown".to_string())
  }
}

// ============================================================================
// FailureReason Enum
// ============================================================================

/// Internal reason recorded on a failed attempt. Never sent to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
  /// Registration with an email that is already taken
  EmailAlreadyExists,

  /// Login with an email that has no account
  UserNotFound,

  /// Login with a password that does not match the stored hash
  InvalidPassword,
}

impl FailureReason {
  /// Stable code used for persistence
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::EmailAlreadyExists => "email_already_exists",
      Self::UserNotFound => "user_not_found",
      Self::InvalidPassword => "invalid_password",
    }
  }
}

impl FromStr for FailureReason {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "email_already_exists" => Ok(Self::EmailAlreadyExists),
      "user_not_found" => Ok(Self::UserNotFound),
      "invalid_password" => Ok(Self::InvalidPassword),
      other => Err(ValueObjectError::UnknownFailureReason(other.to_string())),
    }
  }
}

impl fmt::Display for FailureReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmailAlreadyExists => write!(f, "Email already exists"),
      Self::UserNotFound => write!(f, "User not found"),
      Self::InvalidPassword => write!(f, "Invalid password"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_email_validation() {
    // Valid emails
    assert!(Email::new("test@example.com").is_ok());
    assert!(Email::new("user.name@domain.co.uk").is_ok());

    // Invalid emails
    assert!(Email::new("invalid").is_err());
    assert!(Email::new("@example.com").is_err());
    assert!(Email::new("test@").is_err());
  }

  #[test]
  fn test_email_keeps_case() {
    let email = Email::new("  Test@Example.COM ").unwrap();
    assert_eq!(email.as_str(), "Test@Example.COM");
    assert_ne!(email, Email::new("test@example.com").unwrap());
  }

  #[test]
  fn test_display_name_validation() {
    assert_eq!(DisplayName::new("  Ana  ").unwrap().as_str(), "Ana");
    assert!(DisplayName::new("   ").is_err());
    assert!(DisplayName::new("x".repeat(101)).is_err());
  }

  #[test]
  fn test_password_validation() {
    assert!(Password::new("password123").is_ok());

    assert!(matches!(
      Password::new("short"),
      Err(ValueObjectError::PasswordTooShort { min: 8 })
    ));

    let long_password = "a".repeat(129);
    assert!(matches!(
      Password::new(long_password),
      Err(ValueObjectError::PasswordTooLong { max: 128 })
    ));
  }

  #[test]
  fn test_password_length_counts_characters() {
    let wide = "\u{1F511}".repeat(40);
    assert_eq!(wide.len(), 160);
    assert!(Password::new(wide.clone()).is_ok());
    assert!(Password::for_verification(wide).is_ok());

    assert!(Password::new("\u{e9}".repeat(128)).is_ok());
    assert!(matches!(
      Password::for_verification("\u{e9}".repeat(129)),
      Err(ValueObjectError::PasswordTooLong { max: 128 })
    ));
    assert!(matches!(
      Password::new("\u{e9}".repeat(7)),
      Err(ValueObjectError::PasswordTooShort { min: 8 })
    ));
  }

  #[test]
  fn test_password_for_verification_skips_policy() {
    assert!(Password::for_verification("short").is_ok());
    assert!(matches!(
      Password::for_verification(""),
      Err(ValueObjectError::PasswordMissing)
    ));
  }

  #[test]
  fn test_password_debug_is_redacted() {
    let password = Password::new("supersecret").unwrap();
    assert_eq!(format!("{:?}", password), "Password(***)");
  }

  #[test]
  fn test_password_hash_rejects_garbage() {
    assert!(PasswordHash::from_hash("not-a-phc-string").is_err());
  }

  #[test]
  fn test_session_token_shape() {
    assert!(SessionToken::parse("aaa.bbb.ccc").is_ok());
    assert!(SessionToken::parse("aaa.bbb").is_err());
    assert!(SessionToken::parse("aaa..ccc").is_err());
    assert!(SessionToken::parse("").is_err());
  }

  #[test]
  fn test_client_context_defaults_user_agent() {
    let context = ClientContext::new(None, None);
    assert_eq!(context.user_agent, "Unknown");
    assert_eq!(context.ip_for_log(), "unknown");

    let context = ClientContext::new(Some("10.0.0.1".parse().unwrap()), Some("curl/8".into()));
    assert_eq!(context.user_agent, "curl/8");
    assert_eq!(context.ip_for_log(), "10.0.0.1");
  }

  #[test]
  fn test_failure_reason_codes() {
    for reason in [
      FailureReason::EmailAlreadyExists,
      FailureReason::UserNotFound,
      FailureReason::InvalidPassword,
    ] {
      assert_eq!(reason.as_str().parse::<FailureReason>().unwrap(), reason);
    }
    assert!("locked".parse::<FailureReason>().is_err());
  }

  #[test]
  fn test_failure_reason_display() {
    assert_eq!(FailureReason::UserNotFound.to_string(), "User not found");
    assert_eq!(FailureReason::InvalidPassword.to_string(), "Invalid password");
  }
}
