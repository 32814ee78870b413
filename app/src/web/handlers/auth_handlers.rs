// app/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::{LoginInput, RegisterInput};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(
  name = "handler::register",
  skip(app_state, payload),
  fields(req_email = payload.email.as_deref().unwrap_or_default())
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterInput>,
) -> Result<HttpResponse, AppError> {
  let session = app_state.identity.register(payload.into_inner()).await?;
  info!(user_id = %session.user.id, "Registration successful.");
  Ok(HttpResponse::Created().json(session))
}

#[instrument(
  name = "handler::login",
  skip(app_state, payload),
  fields(req_email = payload.email.as_deref().unwrap_or_default())
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
  let session = app_state.identity.login(payload.into_inner()).await?;
  info!(user_id = %session.user.id, "Login successful.");
  Ok(HttpResponse::Ok().json(session))
}
