pub mod cookies;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use cookies::{SESSION_COOKIE, SessionCookieSettings};
pub use dtos::{
  DatabaseHealthResponse, ErrorResponse, HealthResponse, LoginRequest, MessageResponse,
  RegisterRequest, UserEnvelope,
};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{
  AuthenticatedUser, RateLimitMiddleware, RequestId, RequestIdExt, RequestIdMiddleware,
  SessionAuthMiddleware,
};
pub use routes::{AuthRouteDependencies, configure_auth_routes, configure_health_routes};
