// app/src/web/auth.rs

//! Bearer-token extractors. Handlers that take one of these are protected;
//! extraction fails with 401 (no or bad token) or 403 (not an admin).

use crate::errors::AppError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use storefront::{IdentityError, Principal, Role};

/// Any caller with a valid token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

/// A caller with a valid token and the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

fn bearer_token(req: &HttpRequest) -> Option<&str> {
  req
    .headers()
    .get(AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<Principal, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("application state is not registered".to_string()))?;
  let token = bearer_token(req).ok_or(IdentityError::MissingToken)?;
  Ok(state.identity.verify(token)?)
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req).map(AuthenticatedUser))
  }
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req).and_then(|principal| {
      principal.require(Role::Admin)?;
      Ok(AdminUser(principal))
    }))
  }
}
