use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher implementation
///
/// Defaults follow the OWASP baseline:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
///
/// Hashing and verification run on the blocking thread pool so a burst of
/// logins does not stall the async workers.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  pub const DEFAULT_MEMORY_COST_KIB: u32 = 19456;
  pub const DEFAULT_TIME_COST: u32 = 2;
  pub const DEFAULT_PARALLELISM: u32 = 1;

  /// Creates a hasher with the default parameters
  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(
      Self::DEFAULT_MEMORY_COST_KIB,
      Self::DEFAULT_TIME_COST,
      Self::DEFAULT_PARALLELISM,
    )
  }

  /// Creates a hasher with explicit cost parameters
  pub fn with_params(
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
  ) -> Result<Self, AuthError> {
    let params = Params::new(memory_cost, time_cost, parallelism, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  /// Hashes a plain text password with a fresh random salt
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    let hash = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| HashError::HashingFailed(format!("Hashing task failed: {}", e)))?
    .map_err(HashError::from)?;

    PasswordHash::from_hash(hash).map_err(|_| AuthError::Hash(HashError::InvalidFormat))
  }

  /// Verifies a plain text password against a stored hash
  ///
  /// `Ok(false)` means the password does not match; `Err` is reserved for
  /// hashes that cannot be checked at all.
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();
    let stored = hashed_password.as_str().to_string();

    tokio::task::spawn_blocking(move || {
      let parsed_hash = Argon2PasswordHash::new(&stored).map_err(|_| HashError::InvalidFormat)?;

      // verify_password compares in constant time
      match argon2.verify_password(password.as_str().as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::VerificationFailed(e.to_string())),
      }
    })
    .await
    .map_err(|e| HashError::VerificationFailed(format!("Verification task failed: {}", e)))?
    .map_err(AuthError::Hash)
  }
}
