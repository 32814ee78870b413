// core/src/checkout/mod.rs

//! Checkout orchestration.
//!
//! Two independent calls, each backed by its own pipeline:
//!
//! 1. [`CheckoutOrchestrator::compute_charge_amount`] validates the cart,
//!    totals it in minor units and opens a payment intent with the processor.
//! 2. [`CheckoutOrchestrator::create_order`] re-validates the same cart after
//!    the client reports a successful payment and records an immutable order.
//!
//! The calls share no state. A client may call them out of order, retry
//! either one, or skip the first entirely, so each one validates its input
//! from scratch.

pub mod contexts;

mod charge_pipeline;
mod order_pipeline;

use crate::cart::Cart;
use crate::error::{CheckoutError, PaymentError};
use crate::models::{Order, OrderCustomer, Principal};
use crate::money::MINIMUM_CHARGE_CENTS;
use crate::payment::PaymentGateway;
use crate::store::OrderStore;
use crate::workflow::{ContextData, Pipeline, PipelineOutcome, WorkflowError};
use contexts::{ChargeCtxData, OrderCtxData};
use std::sync::Arc;
use tracing::{info, instrument};

pub use order_pipeline::snapshot_lines;

/// Metadata value used when a payment intent is requested without a caller.
pub const GUEST_CUSTOMER_REF: &str = "guest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
  /// ISO currency code sent to the processor, lower-case (`usd`).
  pub currency: String,
  pub minimum_charge_cents: i64,
  /// Look the payment intent up with the processor before recording an order.
  pub verify_payments: bool,
}

impl Default for CheckoutSettings {
  fn default() -> Self {
    CheckoutSettings {
      currency: "usd".to_string(),
      minimum_charge_cents: MINIMUM_CHARGE_CENTS,
      verify_payments: false,
    }
  }
}

/// Result of a successful charge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeQuote {
  pub amount_cents: i64,
  pub payment_intent_id: String,
  /// Handed to the browser so it can confirm the payment with the processor.
  pub client_secret: String,
}

pub struct CheckoutOrchestrator {
  orders: Arc<dyn OrderStore>,
  gateway: Arc<dyn PaymentGateway>,
  settings: Arc<CheckoutSettings>,
  charge_pipeline: Pipeline<ChargeCtxData, CheckoutError>,
  order_pipeline: Pipeline<OrderCtxData, CheckoutError>,
}

impl std::fmt::Debug for CheckoutOrchestrator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CheckoutOrchestrator")
      .field("settings", &self.settings)
      .field("charge_pipeline", &self.charge_pipeline)
      .field("order_pipeline", &self.order_pipeline)
      .finish()
  }
}

impl CheckoutOrchestrator {
  pub fn new(orders: Arc<dyn OrderStore>, gateway: Arc<dyn PaymentGateway>, settings: CheckoutSettings) -> Self {
    CheckoutOrchestrator {
      orders,
      gateway,
      settings: Arc::new(settings),
      charge_pipeline: charge_pipeline::build(),
      order_pipeline: order_pipeline::build(),
    }
  }

  pub fn settings(&self) -> &CheckoutSettings {
    &self.settings
  }

  /// Totals `cart` in minor units and opens a payment intent for it.
  ///
  /// Fails with `EmptyCart`, `InvalidCart` or `BelowMinimumCharge` before
  /// the processor is contacted.
  #[instrument(
    name = "checkout::compute_charge_amount",
    skip_all,
    fields(customer = principal.map_or(GUEST_CUSTOMER_REF, |p| p.id.as_str()), lines = cart.len()),
    err(Display)
  )]
  pub async fn compute_charge_amount(
    &self,
    principal: Option<&Principal>,
    cart: &Cart,
  ) -> Result<ChargeQuote, CheckoutError> {
    let ctx_data = ContextData::new(ChargeCtxData {
      gateway: self.gateway.clone(),
      settings: self.settings.clone(),
      customer_ref: principal
        .map(|p| p.id.clone())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| GUEST_CUSTOMER_REF.to_string()),
      cart: cart.clone(),
      amount_cents: None,
      payment_intent: None,
    });

    if self.charge_pipeline.run(ctx_data.clone()).await? == PipelineOutcome::Stopped {
      return Err(incomplete(charge_pipeline::PIPELINE_NAME, "payment_intent"));
    }

    let final_ctx = ctx_data.snapshot();
    let intent = final_ctx
      .payment_intent
      .ok_or_else(|| incomplete(charge_pipeline::PIPELINE_NAME, "payment_intent"))?;
    let client_secret = intent
      .client_secret
      .clone()
      .ok_or_else(|| PaymentError::Rejected(format!("payment intent {} has no client secret", intent.id)))?;

    Ok(ChargeQuote {
      amount_cents: intent.amount_cents,
      payment_intent_id: intent.id,
      client_secret,
    })
  }

  /// Records an order for `cart`, attributed to `principal`, with status `paid`.
  ///
  /// Nothing is written unless the principal has an id and email, every line
  /// has a product id, name and valid price, and the total is positive.
  #[instrument(
    name = "checkout::create_order",
    skip_all,
    fields(lines = cart.len(), payment_reference = payment_reference.unwrap_or_default()),
    err(Display)
  )]
  pub async fn create_order(
    &self,
    principal: Option<&Principal>,
    cart: &Cart,
    payment_reference: Option<&str>,
  ) -> Result<Order, CheckoutError> {
    let ctx_data = ContextData::new(OrderCtxData {
      orders: self.orders.clone(),
      gateway: self.gateway.clone(),
      settings: self.settings.clone(),
      customer: principal.map(|p| OrderCustomer {
        id: p.id.clone(),
        email: p.email.clone(),
        name: p.name.clone(),
      }),
      cart: cart.clone(),
      payment_reference: payment_reference.map(str::trim).unwrap_or_default().to_string(),
      lines: Vec::new(),
      total: None,
      amount_cents: None,
      payment_verified: false,
      order: None,
    });

    if self.order_pipeline.run(ctx_data.clone()).await? == PipelineOutcome::Stopped {
      return Err(incomplete(order_pipeline::PIPELINE_NAME, "order"));
    }

    let order = ctx_data
      .write()
      .order
      .take()
      .ok_or_else(|| incomplete(order_pipeline::PIPELINE_NAME, "order"))?;
    info!(order_id = %order.id, customer = %order.user.id, "Checkout completed.");
    Ok(order)
  }
}

fn incomplete(pipeline: &'static str, missing: &'static str) -> CheckoutError {
  CheckoutError::Workflow(WorkflowError::Incomplete { pipeline, missing })
}
