// core/src/models/cart_item.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cart line exactly as the client sent it.
///
/// Price and quantity are kept as raw JSON so the server can apply its own
/// coercion rules (see [`crate::money`]) instead of trusting the client.
/// Accepts the storefront's `_id`/`qty` spellings as well as
/// `productId`/`quantity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  #[serde(default, alias = "_id")]
  pub product_id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub price: Option<Value>,
  #[serde(default, alias = "qty")]
  pub quantity: Option<Value>,
  #[serde(default)]
  pub image_url: Option<String>,
}

impl CartItem {
  /// Product id with surrounding whitespace removed; `None` when blank.
  pub fn product_key(&self) -> Option<&str> {
    self.product_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
  }

  pub fn display_name(&self) -> Option<&str> {
    self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
  }
}
