use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weatherdash::{
  adapters::http::{
    AuthRouteDependencies, RateLimitMiddleware, RequestIdMiddleware, SessionCookieSettings,
    configure_auth_routes, configure_health_routes,
  },
  application::auth::{
    GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
  },
  domain::auth::ports::{LoginAttemptRepository, UserRepository},
  domain::auth::services::AuthService,
  domain::health::StoreHealth,
  infrastructure::{
    config::Config,
    persistence::memory::{
      InMemoryLoginAttemptRepository, InMemoryStoreHealth, InMemoryUserRepository,
    },
    persistence::postgres::{
      PostgresLoginAttemptRepository, PostgresStoreHealth, PostgresUserRepository,
    },
    security::{Argon2PasswordHasher, JwtSessionIssuer},
  },
};

struct Storage {
  user_repo: Arc<dyn UserRepository>,
  attempt_repo: Arc<dyn LoginAttemptRepository>,
  store_health: Arc<dyn StoreHealth>,
}

async fn connect_storage(config: &Config) -> anyhow::Result<Storage> {
  if config.database.is_in_memory() {
    tracing::warn!("Using in-memory storage; accounts are lost on restart");
    return Ok(Storage {
      user_repo: Arc::new(InMemoryUserRepository::new()),
      attempt_repo: Arc::new(InMemoryLoginAttemptRepository::new()),
      store_health: Arc::new(InMemoryStoreHealth),
    });
  }

  tracing::info!("Connecting to database");

  let connect_timeout = Duration::from_secs(config.database.connect_timeout_seconds);
  let db_pool = tokio::time::timeout(
    connect_timeout,
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    anyhow::anyhow!(
      "Database connection timed out after {} seconds",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Could not connect to database")?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  Ok(Storage {
    user_repo: Arc::new(PostgresUserRepository::new(db_pool.clone())),
    attempt_repo: Arc::new(PostgresLoginAttemptRepository::new(db_pool.clone())),
    store_health: Arc::new(PostgresStoreHealth::new(db_pool)),
  })
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "weatherdash=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting weatherdash credential service");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!(
    environment = %config.server.environment,
    "Configuration loaded successfully"
  );

  let storage = connect_storage(&config).await?;

  let session_ttl = chrono::Duration::seconds(
    i64::try_from(config.security.session_ttl_seconds).context("session_ttl_seconds too large")?,
  );
  let auth_service = Arc::new(AuthService::new(
    storage.user_repo,
    storage.attempt_repo,
    Arc::new(Argon2PasswordHasher::new()?),
    Arc::new(JwtSessionIssuer::new(&config.security.jwt_secret, session_ttl)),
  ));

  // Limiter state must be shared by all workers
  let window = config.rate_limit.window();
  let auth_routes = AuthRouteDependencies {
    register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    logout_use_case: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
    get_user_use_case: Arc::new(GetCurrentUserUseCase::new(auth_service)),
    cookie_settings: SessionCookieSettings::new(
      config.server.is_production(),
      session_ttl.num_seconds(),
    ),
    register_limiter: RateLimitMiddleware::new(
      "register",
      config.rate_limit.register_max_attempts,
      window,
    )?,
    login_limiter: RateLimitMiddleware::new("login", config.rate_limit.login_max_attempts, window)?,
  };
  auth_routes.register_limiter.spawn_pruning(window);
  auth_routes.login_limiter.spawn_pruning(window);
  let store_health = storage.store_health;

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let auth_routes = auth_routes.clone();
    let store_health = store_health.clone();

    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .service(web::scope("/auth").configure(|cfg| configure_auth_routes(cfg, auth_routes)))
      .configure(|cfg| configure_health_routes(cfg, store_health))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}
