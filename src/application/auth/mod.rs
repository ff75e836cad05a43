//! Authentication use cases
//!
//! Register, log in, log out and resolve the current user from a session
//! token.

mod get_current_user;
mod login_user;
mod logout_user;
mod register_user;

pub use get_current_user::{GetCurrentUserResponse, GetCurrentUserUseCase};
pub use login_user::{LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use logout_user::LogoutUserUseCase;
pub use register_user::{RegisterUserCommand, RegisterUserResponse, RegisterUserUseCase};
