use thiserror::Error;

/// Failures surfaced by the session client
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("Invalid credentials or session")]
  Unauthorized,

  #[error("Email already registered")]
  Conflict,

  #[error("Too many attempts, retry later")]
  RateLimited,

  #[error("Rejected input: {0}")]
  Validation(String),

  #[error("Server error {status}: {message}")]
  Server { status: u16, message: String },

  #[error("Transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Session store I/O failed: {0}")]
  Io(#[from] std::io::Error),

  #[error("Session store contents are corrupt: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl ClientError {
  /// Maps a non-success status and its error message to a variant
  pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
    match status {
      reqwest::StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
      reqwest::StatusCode::CONFLICT => ClientError::Conflict,
      reqwest::StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited,
      reqwest::StatusCode::BAD_REQUEST => ClientError::Validation(message),
      other => ClientError::Server {
        status: other.as_u16(),
        message,
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::StatusCode;

  #[test]
  fn test_from_status() {
    assert!(matches!(
      ClientError::from_status(StatusCode::UNAUTHORIZED, String::new()),
      ClientError::Unauthorized
    ));
    assert!(matches!(
      ClientError::from_status(StatusCode::CONFLICT, String::new()),
      ClientError::Conflict
    ));
    assert!(matches!(
      ClientError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
      ClientError::RateLimited
    ));
    match ClientError::from_status(StatusCode::BAD_REQUEST, "Invalid email format".into()) {
      ClientError::Validation(message) => assert_eq!(message, "Invalid email format"),
      other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
      ClientError::from_status(StatusCode::BAD_GATEWAY, "upstream".into()),
      ClientError::Server { status: 502, .. }
    ));
  }
}
