// core/src/checkout/charge_pipeline.rs

//! Cart -> payable amount -> processor payment intent.

use super::contexts::ChargeCtxData;
use crate::error::CheckoutError;
use crate::payment::PaymentIntentRequest;
use crate::workflow::{ContextData, Pipeline, StepControl, WorkflowError};
use tracing::{info, instrument};

pub(crate) const PIPELINE_NAME: &str = "checkout.charge";

pub(crate) fn build() -> Pipeline<ChargeCtxData, CheckoutError> {
  let mut p = Pipeline::<ChargeCtxData, CheckoutError>::new(
    PIPELINE_NAME,
    &[
      ("validate_cart", false, None),
      ("compute_charge_amount", false, None),
      ("create_payment_intent", false, None),
    ],
  );
  p.on_root("validate_cart", validate_cart);
  p.on_root("compute_charge_amount", compute_charge_amount);
  p.on_root("create_payment_intent", create_payment_intent);
  p
}

/// Rejects empty carts and bad prices before the processor is contacted.
#[instrument(name = "charge::validate_cart", skip_all, err(Display))]
async fn validate_cart(ctx_data: ContextData<ChargeCtxData>) -> Result<StepControl, CheckoutError> {
  let guard = ctx_data.read();
  if guard.cart.is_empty() {
    return Err(CheckoutError::EmptyCart);
  }
  guard.cart.priced_lines()?;
  Ok(StepControl::Continue)
}

#[instrument(name = "charge::compute_amount", skip_all, err(Display))]
async fn compute_charge_amount(ctx_data: ContextData<ChargeCtxData>) -> Result<StepControl, CheckoutError> {
  let (amount_cents, minimum_cents) = {
    let guard = ctx_data.read();
    (guard.cart.charge_amount_cents()?, guard.settings.minimum_charge_cents)
  };
  if amount_cents < minimum_cents {
    return Err(CheckoutError::BelowMinimumCharge {
      amount_cents,
      minimum_cents,
    });
  }
  ctx_data.write().amount_cents = Some(amount_cents);
  Ok(StepControl::Continue)
}

#[instrument(name = "charge::create_payment_intent", skip_all, err(Display))]
async fn create_payment_intent(ctx_data: ContextData<ChargeCtxData>) -> Result<StepControl, CheckoutError> {
  let (gateway, request) = {
    let guard = ctx_data.read();
    let amount_cents = guard.amount_cents.ok_or(WorkflowError::Incomplete {
      pipeline: PIPELINE_NAME,
      missing: "amount_cents",
    })?;
    (
      guard.gateway.clone(),
      PaymentIntentRequest {
        amount_cents,
        currency: guard.settings.currency.clone(),
        customer_ref: guard.customer_ref.clone(),
      },
    )
  }; // guard dropped before the processor call

  let intent = gateway.create_intent(request).await?;
  info!(
    payment_intent_id = %intent.id,
    amount_cents = intent.amount_cents,
    "Payment intent created."
  );
  ctx_data.write().payment_intent = Some(intent);
  Ok(StepControl::Continue)
}
