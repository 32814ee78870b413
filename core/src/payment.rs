// core/src/payment.rs

//! Payment-processor port and an in-process mock processor.

use crate::error::PaymentError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
  pub amount_cents: i64,
  pub currency: String,
  /// Tagged onto the intent as `metadata[userId]`; `"guest"` for anonymous carts.
  pub customer_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
  pub id: String,
  pub amount_cents: i64,
  pub currency: String,
  /// Processor status string, e.g. `requires_payment_method`, `succeeded`.
  pub status: String,
  pub client_secret: Option<String>,
}

impl PaymentIntent {
  pub fn succeeded(&self) -> bool {
    self.status == "succeeded"
  }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent, PaymentError>;

  async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError>;
}

/// Keeps intents in memory. With `auto_confirm`, intents are created already
/// `succeeded`, which lets a local storefront run without a real processor.
#[derive(Debug, Default)]
pub struct MockPaymentGateway {
  auto_confirm: bool,
  intents: Mutex<HashMap<String, PaymentIntent>>,
  requests: Mutex<Vec<PaymentIntentRequest>>,
}

impl MockPaymentGateway {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn auto_confirming() -> Self {
    MockPaymentGateway {
      auto_confirm: true,
      ..Self::default()
    }
  }

  /// Simulates the customer completing payment for `intent_id`.
  pub fn confirm(&self, intent_id: &str) -> Result<(), PaymentError> {
    let mut intents = self.intents.lock();
    let intent = intents
      .get_mut(intent_id)
      .ok_or_else(|| PaymentError::Rejected(format!("No such payment_intent: '{intent_id}'")))?;
    intent.status = "succeeded".to_string();
    info!(payment_intent_id = %intent_id, "Mock payment confirmed.");
    Ok(())
  }

  /// Every create request received so far, oldest first.
  pub fn requests(&self) -> Vec<PaymentIntentRequest> {
    self.requests.lock().clone()
  }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
  #[instrument(name = "mock_gateway::create_intent", skip(self), fields(amount = request.amount_cents))]
  async fn create_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent, PaymentError> {
    self.requests.lock().push(request.clone());
    if request.amount_cents <= 0 {
      return Err(PaymentError::Rejected("Amount must be greater than zero".to_string()));
    }

    let id = format!("mock_pi_{}", Uuid::new_v4().simple());
    let intent = PaymentIntent {
      id: id.clone(),
      amount_cents: request.amount_cents,
      currency: request.currency,
      status: if self.auto_confirm { "succeeded" } else { "requires_payment_method" }.to_string(),
      client_secret: Some(format!("{}_secret_{}", id, Uuid::new_v4().simple())),
    };
    self.intents.lock().insert(id, intent.clone());
    info!(payment_intent_id = %intent.id, "Mock payment intent created.");
    Ok(intent)
  }

  async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
    self
      .intents
      .lock()
      .get(intent_id)
      .cloned()
      .ok_or_else(|| PaymentError::Rejected(format!("No such payment_intent: '{intent_id}'")))
  }
}
