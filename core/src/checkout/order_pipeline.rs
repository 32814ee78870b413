// core/src/checkout/order_pipeline.rs

//! Paid cart -> immutable order snapshot.

use super::contexts::OrderCtxData;
use crate::cart::Cart;
use crate::error::{CheckoutError, PaymentError};
use crate::models::{Order, OrderLine, OrderStatus};
use crate::money;
use crate::workflow::{ContextData, Pipeline, SkipCondition, StepControl, WorkflowError};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub(crate) const PIPELINE_NAME: &str = "checkout.order";

pub(crate) fn build() -> Pipeline<OrderCtxData, CheckoutError> {
  let skip_unless_verifying: SkipCondition<OrderCtxData> =
    Arc::new(|ctx_data: &ContextData<OrderCtxData>| !ctx_data.read().settings.verify_payments);

  let mut p = Pipeline::<OrderCtxData, CheckoutError>::new(
    PIPELINE_NAME,
    &[
      ("verify_customer", false, None),
      ("snapshot_line_items", false, None),
      ("confirm_payment", true, Some(skip_unless_verifying)),
      ("persist_order", false, None),
    ],
  );
  p.on_root("verify_customer", verify_customer);
  p.on_root("snapshot_line_items", snapshot_line_items);
  p.on_root("confirm_payment", confirm_payment);
  p.on_root("persist_order", persist_order);
  p
}

#[instrument(name = "order::verify_customer", skip_all, err(Display))]
async fn verify_customer(ctx_data: ContextData<OrderCtxData>) -> Result<StepControl, CheckoutError> {
  let identified = ctx_data
    .read()
    .customer
    .as_ref()
    .is_some_and(|c| !c.id.trim().is_empty() && !c.email.trim().is_empty());
  if !identified {
    return Err(CheckoutError::Unauthenticated);
  }
  Ok(StepControl::Continue)
}

/// Line snapshots plus the decimal total and the minor-unit amount the
/// processor should have charged for them.
pub fn snapshot_lines(cart: &Cart) -> Result<(Vec<OrderLine>, Decimal, i64), CheckoutError> {
  if cart.is_empty() {
    return Err(CheckoutError::EmptyCart);
  }

  let mut lines = Vec::with_capacity(cart.len());
  let mut total = Decimal::ZERO;
  let mut amount_cents: i64 = 0;
  for (index, item) in cart.items().iter().enumerate() {
    let product_id = item.product_key().ok_or_else(|| CheckoutError::InvalidLineItem {
      index,
      reason: "missing product id".to_string(),
    })?;
    let name = item.display_name().ok_or_else(|| CheckoutError::InvalidLineItem {
      index,
      reason: "missing name".to_string(),
    })?;
    let unit_price = money::parse_price(item.price.as_ref())
      .ok_or_else(|| CheckoutError::InvalidCart(format!("item {index}")))?;
    let quantity = money::coerce_quantity(item.quantity.as_ref()).ok_or_else(|| CheckoutError::InvalidLineItem {
      index,
      reason: "quantity out of range".to_string(),
    })?;

    let line = OrderLine {
      product_id: product_id.to_string(),
      name: name.to_string(),
      unit_price,
      quantity,
      image_url: item.image_url.clone().unwrap_or_default(),
    };
    total = line
      .subtotal()
      .and_then(|subtotal| total.checked_add(subtotal))
      .ok_or_else(|| CheckoutError::InvalidCart("cart total out of range".to_string()))?;
    amount_cents = money::line_minor_units(unit_price, quantity)
      .and_then(|cents| amount_cents.checked_add(cents))
      .ok_or_else(|| CheckoutError::InvalidCart("cart total out of range".to_string()))?;
    lines.push(line);
  }

  Ok((lines, money::to_cents_precision(total), amount_cents))
}

#[instrument(name = "order::snapshot_line_items", skip_all, err(Display))]
async fn snapshot_line_items(ctx_data: ContextData<OrderCtxData>) -> Result<StepControl, CheckoutError> {
  let (lines, total, amount_cents) = snapshot_lines(&ctx_data.read().cart)?;
  if total <= Decimal::ZERO {
    return Err(CheckoutError::ZeroTotal);
  }
  let mut guard = ctx_data.write();
  guard.lines = lines;
  guard.total = Some(total);
  guard.amount_cents = Some(amount_cents);
  Ok(StepControl::Continue)
}

/// Only runs with `verify_payments` on: the referenced intent must exist,
/// have succeeded and match the recomputed amount.
#[instrument(name = "order::confirm_payment", skip_all, err(Display))]
async fn confirm_payment(ctx_data: ContextData<OrderCtxData>) -> Result<StepControl, CheckoutError> {
  let (gateway, reference, expected_cents) = {
    let guard = ctx_data.read();
    let expected_cents = guard.amount_cents.ok_or(WorkflowError::Incomplete {
      pipeline: PIPELINE_NAME,
      missing: "amount_cents",
    })?;
    (guard.gateway.clone(), guard.payment_reference.clone(), expected_cents)
  };
  if reference.is_empty() {
    return Err(CheckoutError::PaymentNotConfirmed("missing payment reference".to_string()));
  }

  let intent = gateway.retrieve_intent(&reference).await.map_err(|e| match e {
    PaymentError::Rejected(message) => CheckoutError::PaymentNotConfirmed(message),
    other => CheckoutError::Payment(other),
  })?;
  if !intent.succeeded() {
    return Err(CheckoutError::PaymentNotConfirmed(format!(
      "payment {} has status '{}'",
      intent.id, intent.status
    )));
  }
  if intent.amount_cents != expected_cents {
    return Err(CheckoutError::PaymentNotConfirmed(format!(
      "payment {} charged {} but the order totals {}",
      intent.id,
      money::format_minor_units(intent.amount_cents),
      money::format_minor_units(expected_cents)
    )));
  }

  ctx_data.write().payment_verified = true;
  Ok(StepControl::Continue)
}

#[instrument(name = "order::persist", skip_all, err(Display))]
async fn persist_order(ctx_data: ContextData<OrderCtxData>) -> Result<StepControl, CheckoutError> {
  let (orders, order, verified) = {
    let guard = ctx_data.read();
    let customer = guard.customer.clone().ok_or(CheckoutError::Unauthenticated)?;
    let total = guard.total.ok_or(WorkflowError::Incomplete {
      pipeline: PIPELINE_NAME,
      missing: "total",
    })?;
    let order = Order {
      id: Uuid::new_v4(),
      user: customer,
      items: guard.lines.clone(),
      total,
      payment_reference: guard.payment_reference.clone(),
      status: OrderStatus::Paid,
      created_at: Utc::now(),
    };
    (guard.orders.clone(), order, guard.payment_verified)
  };

  if !verified {
    warn!(
      order_id = %order.id,
      payment_reference = %order.payment_reference,
      "Recording order as paid without processor confirmation."
    );
  }

  let saved = orders.insert(order).await?;
  info!(order_id = %saved.id, total = %saved.total, lines = saved.items.len(), "Order recorded.");
  ctx_data.write().order = Some(saved);
  Ok(StepControl::Continue)
}
