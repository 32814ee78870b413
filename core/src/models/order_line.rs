// core/src/models/order_line.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Frozen copy of a cart line taken when the order is recorded. Later catalog
/// edits or deletions never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
  #[serde(rename = "productId")]
  pub product_id: String,
  pub name: String,
  #[serde(rename = "price", with = "rust_decimal::serde::float")]
  pub unit_price: Decimal,
  #[serde(rename = "qty")]
  pub quantity: u32,
  #[serde(rename = "imageUrl", default)]
  pub image_url: String,
}

impl OrderLine {
  /// `None` if `price × qty` overflows.
  pub fn subtotal(&self) -> Option<Decimal> {
    self.unit_price.checked_mul(Decimal::from(self.quantity))
  }
}
