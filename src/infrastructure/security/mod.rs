mod argon2_hasher;
mod jwt_session_issuer;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_session_issuer::JwtSessionIssuer;
