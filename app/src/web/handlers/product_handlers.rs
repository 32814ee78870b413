// app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::NewProductInput;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::AdminUser;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub category: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list(query.category.as_deref()).await?;
  info!(count = products.len(), "Products listed.");
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = Uuid::parse_str(path.trim()).map_err(|_| AppError::NotFound("Product not found".to_string()))?;
  let product = app_state.catalog.get(product_id).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip(app_state, admin, payload), fields(admin_id = %admin.0.id))]
pub async fn create_product_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  payload: web::Json<NewProductInput>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.create(payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(product))
}

/// Ids that do not parse are treated like unknown ids.
#[instrument(name = "handler::delete_product", skip(app_state, admin, path), fields(admin_id = %admin.0.id, product_id = %path.as_str()))]
pub async fn delete_product_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  if let Ok(product_id) = Uuid::parse_str(path.trim()) {
    app_state.catalog.delete(product_id).await?;
  }
  Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
