use actix_web::{
  Error, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{HeaderValue, RETRY_AFTER},
};
use futures_util::future::LocalBoxFuture;
use governor::{
  DefaultKeyedRateLimiter, Quota, RateLimiter,
  clock::{Clock, DefaultClock},
};
use std::{
  future::{Ready, ready},
  net::IpAddr,
  num::NonZeroU32,
  rc::Rc,
  sync::Arc,
  time::Duration,
};

use crate::adapters::http::errors::{ApiError, AuthErrorKind};

/// A quota that cannot be enforced
#[derive(Debug, thiserror::Error)]
#[error("rate limit needs at least one attempt and a non-empty window")]
pub struct InvalidRateLimit;

/// Per-IP limit for one endpoint
///
/// Each client holds `max_attempts` cells and one cell comes back per
/// `window`, so no trailing `window` ever sees more than `max_attempts` calls
/// from the same IP. After a full burst the client waits a whole window per
/// extra call.
#[derive(Clone)]
pub struct RateLimitMiddleware {
  scope: &'static str,
  limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RateLimitMiddleware {
  /// Creates a limiter; build it once and clone it into each worker's app
  pub fn new(
    scope: &'static str,
    max_attempts: u32,
    window: Duration,
  ) -> Result<Self, InvalidRateLimit> {
    let burst = NonZeroU32::new(max_attempts).ok_or(InvalidRateLimit)?;
    let quota = Quota::with_period(window)
      .ok_or(InvalidRateLimit)?
      .allow_burst(burst);

    Ok(Self {
      scope,
      limiter: Arc::new(RateLimiter::keyed(quota)),
    })
  }

  /// Forgets clients whose budget has fully refilled
  pub fn prune(&self) {
    self.limiter.retain_recent();
    self.limiter.shrink_to_fit();
  }

  /// Number of client IPs currently tracked
  pub fn tracked_clients(&self) -> usize {
    self.limiter.len()
  }

  /// Prunes on a fixed interval for the lifetime of the actix system
  pub fn spawn_pruning(&self, every: Duration) {
    let limiter = self.clone();
    actix_web::rt::spawn(async move {
      let mut ticker = actix_web::rt::time::interval(every);
      loop {
        ticker.tick().await;
        let before = limiter.tracked_clients();
        limiter.prune();
        tracing::debug!(
          scope = limiter.scope,
          before,
          after = limiter.tracked_clients(),
          "Pruned rate limiter state"
        );
      }
    });
  }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = RateLimitMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RateLimitMiddlewareService {
      service: Rc::new(service),
      scope: self.scope,
      limiter: self.limiter.clone(),
    }))
  }
}

pub struct RateLimitMiddlewareService<S> {
  service: Rc<S>,
  scope: &'static str,
  limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    // Keyed on the socket peer, forwarded headers are caller-controlled
    let Some(ip) = req.peer_addr().map(|addr| addr.ip()) else {
      tracing::warn!(scope = self.scope, "Could not determine IP for rate limiting");
      return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
    };

    if let Err(not_until) = self.limiter.check_key(&ip) {
      let wait = not_until.wait_time_from(DefaultClock::default().now());
      tracing::warn!(
        scope = self.scope,
        ip = %ip,
        retry_after_secs = wait.as_secs(),
        "Rate limit exceeded"
      );

      let mut response = ApiError::Auth(AuthErrorKind::RateLimitExceeded).error_response();
      let retry_after = wait.as_secs().max(1).to_string();
      if let Ok(value) = HeaderValue::from_str(&retry_after) {
        response.headers_mut().insert(RETRY_AFTER, value);
      }

      return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
    }

    Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) })
  }
}
