pub mod login_attempt_repository;
pub mod store_health;
pub mod user_repository;

pub use login_attempt_repository::PostgresLoginAttemptRepository;
pub use store_health::PostgresStoreHealth;
pub use user_repository::PostgresUserRepository;
