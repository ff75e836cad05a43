use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::entities::{IssuedSession, SessionClaims, User};
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::ports::SessionIssuer;
use crate::domain::auth::value_objects::SessionToken;

/// Claims carried by the session JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
  /// Subject (user ID)
  sub: String,
  /// Email
  email: String,
  /// Issued at (Unix timestamp)
  iat: i64,
  /// Expiration time (Unix timestamp)
  exp: i64,
}

/// HS256 session issuer.
///
/// Tokens are self-contained: nothing is stored server-side, so a token stays
/// valid until `exp` even after logout.
#[derive(Clone)]
pub struct JwtSessionIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  ttl: Duration,
}

impl JwtSessionIssuer {
  /// Session lifetime used unless configured otherwise
  pub const DEFAULT_TTL_DAYS: i64 = 7;

  pub fn new(secret: &str, ttl: Duration) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      ttl,
    }
  }

  /// Signs a session as if it had been issued at `issued_at`
  pub fn issue_at(
    &self,
    user: &User,
    issued_at: DateTime<Utc>,
  ) -> Result<IssuedSession, TokenError> {
    let expires_at = issued_at + self.ttl;

    let claims = Claims {
      sub: user.id.to_string(),
      email: user.email.clone(),
      iat: issued_at.timestamp(),
      exp: expires_at.timestamp(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| TokenError::SigningFailed(e.to_string()))?;

    Ok(IssuedSession {
      token: SessionToken::from_signed(token),
      expires_at,
    })
  }
}

impl SessionIssuer for JwtSessionIssuer {
  fn issue(&self, user: &User) -> Result<IssuedSession, TokenError> {
    self.issue_at(user, Utc::now())
  }

  fn verify(&self, token: &SessionToken) -> Result<SessionClaims, TokenError> {
    let data = decode::<Claims>(token.as_str(), &self.decoding_key, &self.validation)?;
    let claims = data.claims;

    let user_id = Uuid::parse_str(&claims.sub)
      .map_err(|_| TokenError::Invalid("subject is not a user id".to_string()))?;

    Ok(SessionClaims {
      user_id,
      email: claims.email,
      issued_at: timestamp(claims.iat)?,
      expires_at: timestamp(claims.exp)?,
    })
  }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
  Utc
    .timestamp_opt(seconds, 0)
    .single()
    .ok_or_else(|| TokenError::Invalid(format!("timestamp out of range: {}", seconds)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Timelike;

  const SECRET: &str = "unit-test-secret-0123456789abcdef";

  fn user() -> User {
    User::from_db(
      Uuid::new_v4(),
      "ana@example.com".to_string(),
      "Ana".to_string(),
      String::new(),
      Utc::now(),
    )
  }

  fn issuer() -> JwtSessionIssuer {
    JwtSessionIssuer::new(SECRET, Duration::days(JwtSessionIssuer::DEFAULT_TTL_DAYS))
  }

  #[test]
  fn test_issue_and_verify() {
    let issuer = issuer();
    let user = user();

    let session = issuer.issue(&user).unwrap();
    let claims = issuer.verify(&session.token).unwrap();

    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.email, "ana@example.com");
    assert_eq!(claims.expires_at, session.expires_at.with_nanosecond(0).unwrap());
    assert_eq!(claims.expires_at - claims.issued_at, Duration::days(7));
  }

  #[test]
  fn test_token_is_valid_until_the_end_of_the_window() {
    let issuer = issuer();
    let session = issuer
      .issue_at(&user(), Utc::now() - Duration::days(7) + Duration::minutes(1))
      .unwrap();

    assert!(issuer.verify(&session.token).is_ok());
  }

  #[test]
  fn test_expired_token_is_rejected() {
    let issuer = issuer();
    let session = issuer
      .issue_at(&user(), Utc::now() - Duration::days(7) - Duration::seconds(1))
      .unwrap();

    assert!(matches!(
      issuer.verify(&session.token),
      Err(TokenError::Expired)
    ));
  }

  #[test]
  fn test_token_signed_with_other_secret_is_rejected() {
    let session = JwtSessionIssuer::new("another-secret-abcdef0123456789", Duration::days(7))
      .issue(&user())
      .unwrap();

    assert!(matches!(
      issuer().verify(&session.token),
      Err(TokenError::Invalid(_))
    ));
  }

  #[test]
  fn test_tampered_token_is_rejected() {
    let issuer = issuer();
    let session = issuer.issue(&user()).unwrap();
    let mut parts: Vec<String> = session
      .token
      .as_str()
      .split('.')
      .map(str::to_string)
      .collect();
    parts[1] = format!("{}x", parts[1]);
    let tampered = SessionToken::parse(parts.join(".")).unwrap();

    assert!(issuer.verify(&tampered).is_err());
  }
}
