use actix_web::cookie::{Cookie, SameSite, time::Duration};

/// Name of the cookie that carries the session token
pub const SESSION_COOKIE: &str = "access_token";

/// Attributes of the session cookie
#[derive(Debug, Clone, Copy)]
pub struct SessionCookieSettings {
  /// Send only over HTTPS
  pub secure: bool,
  /// Lifetime in seconds, matches the token TTL
  pub max_age_seconds: i64,
}

impl SessionCookieSettings {
  pub fn new(secure: bool, max_age_seconds: i64) -> Self {
    Self {
      secure,
      max_age_seconds,
    }
  }

  /// Cookie that hands the signed token to the browser
  pub fn session_cookie(&self, token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
      .path("/")
      .http_only(true)
      .secure(self.secure)
      .same_site(SameSite::Strict)
      .max_age(Duration::seconds(self.max_age_seconds))
      .finish()
  }

  /// Cookie that makes the browser drop the session
  pub fn removal_cookie(&self) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
      .path("/")
      .http_only(true)
      .secure(self.secure)
      .same_site(SameSite::Strict)
      .finish();
    cookie.make_removal();
    cookie
  }
}
