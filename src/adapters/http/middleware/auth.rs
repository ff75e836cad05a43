use actix_web::{
  Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
  body::EitherBody,
  dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::{
    cookies::SESSION_COOKIE,
    errors::{ApiError, AuthErrorKind},
  },
  application::auth::GetCurrentUserUseCase,
  domain::auth::entities::PublicUser,
};

/// Authentication middleware that validates the session cookie and attaches
/// the user to the request
///
/// Requests without a cookie, or with an expired or forged token, are answered
/// with 401 before the handler runs. Downstream handlers take an
/// [`AuthenticatedUser`] argument.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use weatherdash::application::auth::GetCurrentUserUseCase;
/// # use weatherdash::adapters::http::middleware::SessionAuthMiddleware;
///
/// # async fn example(get_user_use_case: Arc<GetCurrentUserUseCase>) {
/// let app = App::new().service(
///   web::resource("/protected")
///     .wrap(SessionAuthMiddleware::new(get_user_use_case))
///     .route(web::get().to(|| async { "Protected endpoint" })),
/// );
/// # }
/// ```
pub struct SessionAuthMiddleware {
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl SessionAuthMiddleware {
  pub fn new(get_user_use_case: Arc<GetCurrentUserUseCase>) -> Self {
    Self { get_user_use_case }
  }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = SessionAuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(SessionAuthMiddlewareService {
      service: Rc::new(service),
      get_user_use_case: self.get_user_use_case.clone(),
    }))
  }
}

pub struct SessionAuthMiddlewareService<S> {
  service: Rc<S>,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddlewareService<S>
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
    let get_user_use_case = self.get_user_use_case.clone();
    let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

    Box::pin(async move {
      let Some(token) = token.filter(|t| !t.is_empty()) else {
        tracing::debug!("Request without session cookie");
        let response = ApiError::Auth(AuthErrorKind::InvalidSession).error_response();
        return Ok(req.into_response(response).map_into_right_body());
      };

      let current_user = match get_user_use_case.execute(token).await {
        Ok(response) => response,
        Err(e) => {
          let response = ApiError::from(e).error_response();
          return Ok(req.into_response(response).map_into_right_body());
        }
      };

      req
        .extensions_mut()
        .insert(AuthenticatedUser(current_user.public_profile()));

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Profile of the caller, set by [`SessionAuthMiddleware`]
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub PublicUser);

impl FromRequest for AuthenticatedUser {
  type Error = ApiError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(
      req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(ApiError::Auth(AuthErrorKind::InvalidSession)),
    )
  }
}
