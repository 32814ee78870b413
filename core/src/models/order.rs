// core/src/models/order.rs

use super::order_line::OrderLine;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Orders are only ever recorded after the client reports a successful
/// payment, so `Paid` is the single state. See DESIGN.md on why there is no
/// pending/failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Paid,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Paid => "paid",
    }
  }

  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "paid" => Some(OrderStatus::Paid),
      _ => None,
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Buyer details copied from the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
  pub id: String,
  pub email: String,
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user: OrderCustomer,
  pub items: Vec<OrderLine>,
  #[serde(with = "rust_decimal::serde::float")]
  pub total: Decimal,
  #[serde(rename = "paymentId")]
  pub payment_reference: String,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}
