//! Session client used by the dashboard to talk to the credential service.

mod errors;
mod session_client;
mod store;

pub use errors::ClientError;
pub use session_client::{Credentials, SessionClient};
pub use store::{FileSessionStore, InMemorySessionStore, SessionStore};
