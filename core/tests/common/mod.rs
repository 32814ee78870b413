// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset.

use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use storefront::store::memory::MemoryOrderStore;
use storefront::workflow::{ContextData, StepControl, WorkflowError};
use storefront::{CartItem, CheckoutOrchestrator, CheckoutSettings, MockPaymentGateway, Principal, Role};
use tracing::Level;

// --- Workflow fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("workflow error: {0}")]
  Workflow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<WorkflowError> for TestError {
  fn from(we: WorkflowError) -> Self {
    TestError::Workflow(format!("{:?}", we))
  }
}

pub type StepFuture = Pin<Box<dyn Future<Output = Result<StepControl, TestError>> + Send>>;

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> impl Fn(ContextData<TestContext>) -> StepFuture + Send + Sync + 'static {
  move |ctx: ContextData<TestContext>| -> StepFuture {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(StepControl::Stop);
      }
      Ok(StepControl::Continue)
    })
  }
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> impl Fn(ContextData<TestContext>) -> StepFuture + Send + Sync + 'static {
  move |ctx: ContextData<TestContext>| -> StepFuture {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  }
}

// --- Storefront fixtures ---
pub fn cart_item(id: &str, price: Value, qty: Value) -> CartItem {
  CartItem {
    product_id: Some(id.to_string()),
    name: Some(format!("Product {id}")),
    price: Some(price),
    quantity: Some(qty),
    image_url: Some(format!("https://img.example/{id}.png")),
  }
}

/// The two-line cart from the storefront docs: 2 × 20.00 + 1 × 75.00.
pub fn reference_items() -> Vec<CartItem> {
  vec![cart_item("tee", json!(20), json!(2)), cart_item("shoes", json!(75), json!(1))]
}

pub fn customer() -> Principal {
  Principal {
    id: "6650f0c2a1".to_string(),
    email: "ann@example.com".to_string(),
    name: "Ann".to_string(),
    role: Role::User,
  }
}

pub struct CheckoutHarness {
  pub orchestrator: CheckoutOrchestrator,
  pub orders: Arc<MemoryOrderStore>,
  pub gateway: Arc<MockPaymentGateway>,
}

pub fn checkout_harness(settings: CheckoutSettings) -> CheckoutHarness {
  let orders = Arc::new(MemoryOrderStore::new());
  let gateway = Arc::new(MockPaymentGateway::new());
  CheckoutHarness {
    orchestrator: CheckoutOrchestrator::new(orders.clone(), gateway.clone(), settings),
    orders,
    gateway,
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
