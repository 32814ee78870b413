// app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::{AdminUser, AuthenticatedUser};

#[instrument(name = "handler::list_orders", skip(app_state, admin), fields(admin_id = %admin.0.id))]
pub async fn list_orders_handler(admin: AdminUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_all().await?;
  info!(count = orders.len(), "Orders listed.");
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::my_orders", skip(app_state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn my_orders_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_for_customer(&auth_user.0.id).await?;
  Ok(HttpResponse::Ok().json(orders))
}
