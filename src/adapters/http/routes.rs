use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
};
use crate::domain::health::StoreHealth;

use super::cookies::SessionCookieSettings;
use super::errors::json_error_handler;
use super::handlers::auth::{
  get_current_user_handler, login_handler, logout_handler, register_handler,
};
use super::handlers::health::{database_health_handler, health_handler};
use super::middleware::{RateLimitMiddleware, SessionAuthMiddleware};

/// Everything the `/auth` endpoints need
///
/// Rate limiters hold shared state. Build this once before `HttpServer::new`
/// and clone it into the app factory so every worker counts against the same
/// buckets.
#[derive(Clone)]
pub struct AuthRouteDependencies {
  pub register_use_case: Arc<RegisterUserUseCase>,
  pub login_use_case: Arc<LoginUserUseCase>,
  pub logout_use_case: Arc<LogoutUserUseCase>,
  pub get_user_use_case: Arc<GetCurrentUserUseCase>,
  pub cookie_settings: SessionCookieSettings,
  pub register_limiter: RateLimitMiddleware,
  pub login_limiter: RateLimitMiddleware,
}

/// Configure authentication routes
///
/// # Routes
///
/// - POST /register - Create an account and start a session (rate limited)
/// - POST /login - Start a session (rate limited)
/// - POST /logout - Expire the session cookie
/// - GET /me - Profile of the session owner
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// # use weatherdash::adapters::http::routes::{AuthRouteDependencies, configure_auth_routes};
///
/// # fn example(deps: AuthRouteDependencies) {
/// let app = App::new().service(
///   web::scope("/auth").configure(|cfg| configure_auth_routes(cfg, deps.clone())),
/// );
/// # }
/// ```
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, deps: AuthRouteDependencies) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::Data::new(deps.cookie_settings))
    .app_data(web::Data::new(deps.register_use_case))
    .app_data(web::Data::new(deps.login_use_case))
    .app_data(web::Data::new(deps.logout_use_case))
    .service(
      web::resource("/register")
        .wrap(deps.register_limiter)
        .route(web::post().to(register_handler)),
    )
    .service(
      web::resource("/login")
        .wrap(deps.login_limiter)
        .route(web::post().to(login_handler)),
    )
    .route("/logout", web::post().to(logout_handler))
    .service(
      web::resource("/me")
        .wrap(SessionAuthMiddleware::new(deps.get_user_use_case))
        .route(web::get().to(get_current_user_handler)),
    );
}

/// Configure liveness and store connectivity probes
///
/// - GET /health
/// - GET /health/db
pub fn configure_health_routes(cfg: &mut web::ServiceConfig, store_health: Arc<dyn StoreHealth>) {
  cfg.app_data(web::Data::new(store_health)).service(
    web::scope("/health")
      .route("", web::get().to(health_handler))
      .route("/db", web::get().to(database_health_handler)),
  );
}
