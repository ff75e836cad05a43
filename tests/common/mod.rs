#![allow(dead_code)]

use actix_web::{
  App, Error,
  body::MessageBody,
  dev::{ServiceFactory, ServiceRequest, ServiceResponse},
  web,
};
use chrono::Duration;
use std::sync::Arc;

use weatherdash::{
  adapters::http::{
    AuthRouteDependencies, RateLimitMiddleware, RequestIdMiddleware, SessionCookieSettings,
    configure_auth_routes, configure_health_routes,
  },
  application::auth::{
    GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
  },
  domain::auth::services::AuthService,
  domain::health::StoreHealth,
  infrastructure::{
    persistence::memory::{
      InMemoryLoginAttemptRepository, InMemoryStoreHealth, InMemoryUserRepository,
    },
    security::{Argon2PasswordHasher, JwtSessionIssuer},
  },
};

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Wiring of the credential service over in-memory storage
#[derive(Clone)]
pub struct TestState {
  pub users: Arc<InMemoryUserRepository>,
  pub attempts: Arc<InMemoryLoginAttemptRepository>,
  pub issuer: Arc<JwtSessionIssuer>,
  pub auth_routes: AuthRouteDependencies,
  pub store_health: Arc<dyn StoreHealth>,
}

impl TestState {
  pub fn new() -> Self {
    let users = Arc::new(InMemoryUserRepository::new());
    let attempts = Arc::new(InMemoryLoginAttemptRepository::new());
    let issuer = Arc::new(JwtSessionIssuer::new(SECRET, Duration::days(7)));
    // Cheap hashing parameters keep the suite fast
    let hasher = Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).unwrap());

    let auth_service = Arc::new(AuthService::new(
      users.clone(),
      attempts.clone(),
      hasher,
      issuer.clone(),
    ));
    let window = std::time::Duration::from_secs(60);

    let auth_routes = AuthRouteDependencies {
      register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
      login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
      logout_use_case: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
      get_user_use_case: Arc::new(GetCurrentUserUseCase::new(auth_service)),
      cookie_settings: SessionCookieSettings::new(false, Duration::days(7).num_seconds()),
      register_limiter: RateLimitMiddleware::new("register", 3, window).unwrap(),
      login_limiter: RateLimitMiddleware::new("login", 5, window).unwrap(),
    };

    Self {
      users,
      attempts,
      issuer,
      auth_routes,
      store_health: Arc::new(InMemoryStoreHealth),
    }
  }
}

/// Owns its state so the factory can be handed to `HttpServer::new`
pub fn build_app(
  state: TestState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = Error,
    InitError = (),
  >,
> {
  let TestState {
    auth_routes,
    store_health,
    ..
  } = state;

  App::new()
    .wrap(RequestIdMiddleware::new())
    .service(web::scope("/auth").configure(|cfg| configure_auth_routes(cfg, auth_routes)))
    .configure(|cfg| configure_health_routes(cfg, store_health))
}
