use actix_web::{HttpResponse, web};
use chrono::Utc;
use std::sync::Arc;

use crate::adapters::http::dtos::{DatabaseHealthResponse, HealthResponse};
use crate::domain::health::StoreHealth;

/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(HealthResponse {
    status: "ok",
    timestamp: Utc::now(),
  })
}

/// GET /health/db
///
/// Answers 503 with the store's state whenever it is not `connected`.
pub async fn database_health_handler(health: web::Data<Arc<dyn StoreHealth>>) -> HttpResponse {
  let database = health.status().await;
  let body = DatabaseHealthResponse {
    database,
    timestamp: Utc::now(),
  };

  if database.is_available() {
    HttpResponse::Ok().json(body)
  } else {
    tracing::warn!("Health check reports database {}", database);
    HttpResponse::ServiceUnavailable().json(body)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::health::DatabaseStatus;
  use actix_web::{App, http::StatusCode, test};
  use async_trait::async_trait;

  struct Fixed(DatabaseStatus);

  #[async_trait]
  impl StoreHealth for Fixed {
    async fn status(&self) -> DatabaseStatus {
      self.0
    }
  }

  #[actix_web::test]
  async fn test_health_reports_ok() {
    let app =
      test::init_service(App::new().route("/health", web::get().to(health_handler))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
  }

  #[actix_web::test]
  async fn test_database_health_reports_disconnected() {
    let health: Arc<dyn StoreHealth> = Arc::new(Fixed(DatabaseStatus::Disconnected));
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(health))
        .route("/health/db", web::get().to(database_health_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/health/db").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "disconnected");
  }

  #[actix_web::test]
  async fn test_database_health_reports_connecting_as_unavailable() {
    let health: Arc<dyn StoreHealth> = Arc::new(Fixed(DatabaseStatus::Connecting));
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(health))
        .route("/health/db", web::get().to(database_health_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/health/db").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "connecting");
  }
}
