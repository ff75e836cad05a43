use actix_web::{HttpRequest, HttpResponse, web};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  cookies::{SESSION_COOKIE, SessionCookieSettings},
  dtos::{LoginRequest, MessageResponse, RegisterRequest, UserEnvelope},
  errors::ApiError,
  middleware::AuthenticatedUser,
};
use crate::application::auth::{
  LoginUserCommand, LoginUserUseCase, LogoutUserUseCase, RegisterUserCommand,
  RegisterUserUseCase,
};
use crate::domain::auth::value_objects::ClientContext;

/// Extract the client address for the audit trail
fn extract_ip_address(req: &HttpRequest) -> Option<IpAddr> {
  let info = req.connection_info();
  let addr = info.realip_remote_addr()?;

  // Forwarded headers may carry a port
  addr
    .parse::<IpAddr>()
    .ok()
    .or_else(|| addr.parse::<SocketAddr>().ok().map(|socket| socket.ip()))
}

/// Extract user agent from the request
fn extract_user_agent(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get("User-Agent")
    .and_then(|h| h.to_str().ok())
    .map(|s| s.to_string())
}

fn client_context(req: &HttpRequest) -> ClientContext {
  ClientContext::new(extract_ip_address(req), extract_user_agent(req))
}

/// Handler for user registration
///
/// POST /auth/register
/// Body: RegisterRequest (JSON)
/// Response: `{ user }` with status 201 and the session cookie
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
  cookies: web::Data<SessionCookieSettings>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = RegisterUserCommand {
    name: request.name,
    email: request.email,
    password: request.password,
  };

  let response = use_case.execute(command, client_context(&http_req)).await?;

  Ok(
    HttpResponse::Created()
      .cookie(cookies.session_cookie(response.session_token))
      .json(UserEnvelope {
        user: response.user,
      }),
  )
}

/// Handler for user login
///
/// POST /auth/login
/// Body: LoginRequest (JSON)
/// Response: `{ user }` with status 200 and the session cookie
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  cookies: web::Data<SessionCookieSettings>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = LoginUserCommand {
    email: request.email,
    password: request.password,
  };

  let response = use_case.execute(command, client_context(&http_req)).await?;

  Ok(
    HttpResponse::Ok()
      .cookie(cookies.session_cookie(response.session_token))
      .json(UserEnvelope {
        user: response.user,
      }),
  )
}

/// Handler for user logout
///
/// POST /auth/logout
/// Always succeeds; the response expires the session cookie.
pub async fn logout_handler(
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  cookies: web::Data<SessionCookieSettings>,
  http_req: HttpRequest,
) -> HttpResponse {
  let token = http_req
    .cookie(SESSION_COOKIE)
    .map(|c| c.value().to_string());

  use_case.execute(token);

  HttpResponse::Ok()
    .cookie(cookies.removal_cookie())
    .json(MessageResponse {
      message: "Logged out successfully".to_string(),
    })
}

/// Handler for getting current user information
///
/// GET /auth/me
/// Requires the session cookie; see `SessionAuthMiddleware`.
pub async fn get_current_user_handler(user: AuthenticatedUser) -> HttpResponse {
  HttpResponse::Ok().json(UserEnvelope { user: user.0 })
}
