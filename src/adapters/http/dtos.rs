use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::auth::entities::PublicUser;
use crate::domain::health::DatabaseStatus;

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  /// Name shown on the dashboard
  #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
  pub name: String,

  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(min = 1, max = 128, message = "Password is required"))]
  pub password: String,
}

/// Body of register, login and me responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
  pub user: PublicUser,
}

/// Standard response for operations without data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
  pub message: String,
}

/// Liveness probe body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
  pub timestamp: DateTime<Utc>,
}

/// Store connectivity probe body
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHealthResponse {
  pub database: DatabaseStatus,
  pub timestamp: DateTime<Utc>,
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_register_request_validation_valid() {
    let request = RegisterRequest {
      name: "Ana".to_string(),
      email: "ana@example.com".to_string(),
      password: "SecureP@ss123".to_string(),
    };

    assert!(request.validate().is_ok());
  }

  #[test]
  fn test_register_request_validation_invalid_email() {
    let request = RegisterRequest {
      name: "Ana".to_string(),
      email: "invalid-email".to_string(),
      password: "SecureP@ss123".to_string(),
    };

    assert!(request.validate().is_err());
  }

  #[test]
  fn test_register_request_validation_short_password() {
    let request = RegisterRequest {
      name: "Ana".to_string(),
      email: "ana@example.com".to_string(),
      password: "short".to_string(),
    };

    assert!(request.validate().is_err());
  }

  #[test]
  fn test_register_request_validation_long_name() {
    let request = RegisterRequest {
      name: "a".repeat(101),
      email: "ana@example.com".to_string(),
      password: "SecureP@ss123".to_string(),
    };

    assert!(request.validate().is_err());
  }

  #[test]
  fn test_login_request_accepts_short_password() {
    let request = LoginRequest {
      email: "ana@example.com".to_string(),
      password: "x".to_string(),
    };
    assert!(request.validate().is_ok());

    let empty = LoginRequest {
      email: "ana@example.com".to_string(),
      password: String::new(),
    };
    assert!(empty.validate().is_err());
  }

  #[test]
  fn test_database_health_serializes_lowercase() {
    let body = DatabaseHealthResponse {
      database: DatabaseStatus::Disconnected,
      timestamp: Utc::now(),
    };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["database"], "disconnected");
  }
}
