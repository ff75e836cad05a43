use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::net::IpAddr;
use uuid::Uuid;

use crate::domain::auth::{
  entities::LoginAttempt,
  errors::{AuthError, RepositoryError},
  ports::LoginAttemptRepository,
  value_objects::FailureReason,
};

/// Database row structure for login_attempts table
#[derive(Debug, FromRow)]
struct LoginAttemptRow {
  id: Uuid,
  email: String,
  ip_address: Option<String>,
  user_agent: String,
  success: bool,
  failure_reason: Option<String>,
  user_id: Option<Uuid>,
  attempted_at: DateTime<Utc>,
}

impl TryFrom<LoginAttemptRow> for LoginAttempt {
  type Error = AuthError;

  fn try_from(row: LoginAttemptRow) -> Result<Self, Self::Error> {
    let ip_address = row
      .ip_address
      .map(|ip| ip.parse::<IpAddr>())
      .transpose()
      .map_err(|e| RepositoryError::DatabaseError(format!("Invalid IP address: {}", e)))?;

    let failure_reason = row
      .failure_reason
      .map(|reason| reason.parse::<FailureReason>())
      .transpose()?;

    Ok(LoginAttempt::from_db(
      row.id,
      row.email,
      ip_address,
      row.user_agent,
      row.success,
      failure_reason,
      row.user_id,
      row.attempted_at,
    ))
  }
}

/// PostgreSQL implementation of the LoginAttemptRepository trait
pub struct PostgresLoginAttemptRepository {
  pool: PgPool,
}

impl PostgresLoginAttemptRepository {
  /// Creates a new PostgresLoginAttemptRepository instance
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl LoginAttemptRepository for PostgresLoginAttemptRepository {
  /// Appends an attempt to the audit table
  async fn create(&self, attempt: LoginAttempt) -> Result<LoginAttempt, AuthError> {
    // IpAddr goes through text so the column can stay INET
    let ip_string = attempt.ip_address.map(|ip| ip.to_string());

    let row = sqlx::query_as::<_, LoginAttemptRow>(
      r#"
            INSERT INTO login_attempts
                (id, email, ip_address, user_agent, success, failure_reason, user_id, attempted_at)
            VALUES ($1, $2, CAST($3 AS INET), $4, $5, $6, $7, $8)
            RETURNING
                id, email, HOST(ip_address) AS ip_address, user_agent, success,
                failure_reason, user_id, attempted_at
            "#,
    )
    .bind(attempt.id)
    .bind(&attempt.email)
    .bind(ip_string)
    .bind(&attempt.user_agent)
    .bind(attempt.success)
    .bind(attempt.failure_reason.map(|reason| reason.as_str()))
    .bind(attempt.user_id)
    .bind(attempt.attempted_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create login attempt: {}", e);
      AuthError::Repository(RepositoryError::from(e))
    })?;

    row.try_into()
  }
}
