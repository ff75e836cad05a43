//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Use cases turn raw request data into
//! validated value objects and hand them to the domain services.

pub mod auth;
