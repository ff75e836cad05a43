pub mod auth;
pub mod health;

// Re-export auth module for easier access
pub use auth::*;
