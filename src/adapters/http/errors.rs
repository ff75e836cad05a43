use actix_web::{
  HttpResponse,
  error::{JsonPayloadError, ResponseError},
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (401, 409 or 429)
  Auth(AuthErrorKind),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Unknown email or wrong password (401)
  InvalidCredentials,

  /// Missing, expired or forged session (401)
  InvalidSession,

  /// Email already registered (409)
  EmailAlreadyExists,

  /// Per-IP quota exhausted (429)
  RateLimitExceeded,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials | AuthErrorKind::InvalidSession => {
          StatusCode::UNAUTHORIZED
        }
        AuthErrorKind::EmailAlreadyExists => StatusCode::CONFLICT,
        AuthErrorKind::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
      },
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => {
        let (err_type, msg) = match kind {
          AuthErrorKind::InvalidCredentials => ("unauthorized", "Invalid credentials"),
          AuthErrorKind::InvalidSession => ("unauthorized", "Invalid or expired session"),
          AuthErrorKind::EmailAlreadyExists => ("conflict", "Email already registered"),
          AuthErrorKind::RateLimitExceeded => (
            "rate_limited",
            "Too many requests. Please try again later",
          ),
        };
        (err_type, msg.to_string())
      }
      ApiError::Internal(msg) => {
        // Details stay in the log
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: error_type.to_string(),
        message,
      })
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::EmailAlreadyExists => ApiError::Auth(AuthErrorKind::EmailAlreadyExists),
      AuthError::InvalidSession => ApiError::Auth(AuthErrorKind::InvalidSession),
      AuthError::ValueObject(err) => ApiError::Validation(err.to_string()),
      AuthError::Repository(RepositoryError::DuplicateKey(_)) => {
        ApiError::Auth(AuthErrorKind::EmailAlreadyExists)
      }
      AuthError::Repository(err) => ApiError::Internal(err.to_string()),
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
      AuthError::Token(err) => ApiError::Internal(err.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

/// Malformed JSON bodies become 400s with the standard error shape
pub fn json_error_handler(
  err: JsonPayloadError,
  _req: &actix_web::HttpRequest,
) -> actix_web::Error {
  tracing::debug!("Rejected request body: {}", err);
  ApiError::Validation(format!("Invalid request body: {}", err)).into()
}
