pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{AuthenticatedUser, SessionAuthMiddleware};
pub use rate_limit::{InvalidRateLimit, RateLimitMiddleware};
pub use request_id::{RequestId, RequestIdExt, RequestIdMiddleware};
