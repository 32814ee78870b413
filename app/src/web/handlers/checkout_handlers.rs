// app/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::{Cart, CartItem};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Deserialize, Debug, Default)]
pub struct PaymentIntentRequest {
  #[serde(default)]
  pub items: Vec<CartItem>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
  #[serde(default)]
  pub items: Vec<CartItem>,
  #[serde(default)]
  pub payment_id: Option<String>,
}

#[instrument(
  name = "handler::create_payment_intent",
  skip(app_state, auth_user, payload),
  fields(user_id = %auth_user.0.id, lines = payload.items.len())
)]
pub async fn create_payment_intent_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  payload: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
  let cart = Cart::from_items(payload.into_inner().items);
  let quote = app_state.checkout.compute_charge_amount(Some(&auth_user.0), &cart).await?;
  info!(
    amount_cents = quote.amount_cents,
    payment_intent_id = %quote.payment_intent_id,
    "Payment intent created."
  );
  Ok(HttpResponse::Ok().json(json!({ "clientSecret": quote.client_secret })))
}

#[instrument(
  name = "handler::create_order",
  skip(app_state, auth_user, payload),
  fields(user_id = %auth_user.0.id, lines = payload.items.len())
)]
pub async fn create_order_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let CreateOrderRequest { items, payment_id } = payload.into_inner();
  let cart = Cart::from_items(items);
  let order = app_state
    .checkout
    .create_order(Some(&auth_user.0), &cart, payment_id.as_deref())
    .await?;
  Ok(HttpResponse::Created().json(order))
}
