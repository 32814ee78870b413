// core/src/checkout/contexts.rs

//! Per-run state for the checkout pipelines. Handlers receive these wrapped
//! in `ContextData`.

use super::CheckoutSettings;
use crate::cart::Cart;
use crate::models::{Order, OrderCustomer, OrderLine};
use crate::payment::{PaymentGateway, PaymentIntent};
use crate::store::OrderStore;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChargeCtxData {
  pub gateway: Arc<dyn PaymentGateway>,
  pub settings: Arc<CheckoutSettings>,
  pub customer_ref: String,
  pub cart: Cart,
  pub amount_cents: Option<i64>,
  pub payment_intent: Option<PaymentIntent>,
}

#[derive(Clone)]
pub struct OrderCtxData {
  pub orders: Arc<dyn OrderStore>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub settings: Arc<CheckoutSettings>,
  pub customer: Option<OrderCustomer>,
  pub cart: Cart,
  pub payment_reference: String,
  pub lines: Vec<OrderLine>,
  pub total: Option<Decimal>,
  pub amount_cents: Option<i64>,
  pub payment_verified: bool,
  pub order: Option<Order>,
}
