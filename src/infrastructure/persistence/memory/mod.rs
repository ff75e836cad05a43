//! Process-local storage used when `database.url` is `memory`.
//!
//! Nothing here survives a restart.

mod login_attempt_repository;
mod store_health;
mod user_repository;

pub use login_attempt_repository::InMemoryLoginAttemptRepository;
pub use store_health::InMemoryStoreHealth;
pub use user_repository::InMemoryUserRepository;
