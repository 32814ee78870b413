// core/src/cart.rs

//! The shopping cart as an explicit, session-scoped value.
//!
//! A `Cart` is built per request (from the request body, or from catalog
//! products) and handed to the checkout orchestrator. Nothing about it is
//! global or persisted server-side.

use crate::error::CheckoutError;
use crate::models::{CartItem, Product};
use crate::money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cart line after price and quantity coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
  pub index: usize,
  pub unit_price: Decimal,
  pub quantity: u32,
}

impl PricedLine {
  pub fn subtotal(&self) -> Result<Decimal, CheckoutError> {
    money::line_subtotal(self.unit_price, self.quantity)
      .ok_or_else(|| CheckoutError::InvalidCart(format!("item {} amount out of range", self.index)))
  }

  pub fn minor_units(&self) -> Result<i64, CheckoutError> {
    money::line_minor_units(self.unit_price, self.quantity)
      .ok_or_else(|| CheckoutError::InvalidCart(format!("item {} amount out of range", self.index)))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
  items: Vec<CartItem>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Wraps request items as-is. Lines are not merged, so the order snapshot
  /// mirrors what the client submitted.
  pub fn from_items(items: Vec<CartItem>) -> Self {
    Cart { items }
  }

  pub fn items(&self) -> &[CartItem] {
    &self.items
  }

  pub fn into_items(self) -> Vec<CartItem> {
    self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Adds a line, merging into an existing line for the same product by
  /// summing quantities.
  pub fn add(&mut self, item: CartItem) {
    let key = item.product_key().map(str::to_owned);
    let existing = key
      .as_deref()
      .and_then(|k| self.items.iter_mut().find(|x| x.product_key() == Some(k)));
    match existing {
      Some(line) => {
        let merged = match (
          money::coerce_quantity(line.quantity.as_ref()),
          money::coerce_quantity(item.quantity.as_ref()),
        ) {
          (Some(a), Some(b)) => u64::from(a) + u64::from(b),
          // Keep an out-of-range quantity out of range so pricing rejects it.
          _ => u64::MAX,
        };
        line.quantity = Some(Value::from(merged));
      }
      None => self.items.push(item),
    }
  }

  /// Adds `quantity` units of a catalog product, copying its current name,
  /// price and image.
  pub fn add_product(&mut self, product: &Product, quantity: u32) {
    self.add(CartItem {
      product_id: Some(product.id.to_string()),
      name: Some(product.name.clone()),
      price: Some(Value::String(product.price.to_string())),
      quantity: Some(Value::from(quantity.max(1))),
      image_url: Some(product.image_url.clone()),
    });
  }

  /// Returns `true` if a line was removed.
  pub fn remove(&mut self, product_id: &str) -> bool {
    let before = self.items.len();
    self.items.retain(|x| x.product_key() != Some(product_id));
    self.items.len() != before
  }

  /// Quantities below one are ignored. Returns `true` if a line changed.
  pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
    if quantity < 1 {
      return false;
    }
    match self.items.iter_mut().find(|x| x.product_key() == Some(product_id)) {
      Some(line) => {
        line.quantity = Some(Value::from(quantity));
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  /// Coerces every line. Fails on the first line whose price is missing,
  /// non-numeric, negative or out of range, or whose quantity is out of range.
  pub fn priced_lines(&self) -> Result<Vec<PricedLine>, CheckoutError> {
    self
      .items
      .iter()
      .enumerate()
      .map(|(index, item)| {
        let unit_price = money::parse_price(item.price.as_ref())
          .ok_or_else(|| CheckoutError::InvalidCart(format!("item {index}")))?;
        let quantity = money::coerce_quantity(item.quantity.as_ref()).ok_or_else(|| CheckoutError::InvalidLineItem {
          index,
          reason: "quantity out of range".to_string(),
        })?;
        Ok(PricedLine {
          index,
          unit_price,
          quantity,
        })
      })
      .collect()
  }

  /// Σ round(price × 100) × quantity. No minimum is applied here.
  pub fn charge_amount_cents(&self) -> Result<i64, CheckoutError> {
    self.priced_lines()?.iter().try_fold(0i64, |acc, line| {
      acc
        .checked_add(line.minor_units()?)
        .ok_or_else(|| CheckoutError::InvalidCart("cart total out of range".to_string()))
    })
  }

  /// Σ price × quantity in currency units.
  pub fn total(&self) -> Result<Decimal, CheckoutError> {
    self.priced_lines()?.iter().try_fold(Decimal::ZERO, |acc, line| {
      acc
        .checked_add(line.subtotal()?)
        .ok_or_else(|| CheckoutError::InvalidCart("cart total out of range".to_string()))
    })
  }
}

impl From<Vec<CartItem>> for Cart {
  fn from(items: Vec<CartItem>) -> Self {
    Cart::from_items(items)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use serde_json::json;
  use std::str::FromStr;
  use uuid::Uuid;

  fn item(id: &str, price: Value, qty: Value) -> CartItem {
    CartItem {
      product_id: Some(id.to_string()),
      name: Some(format!("Product {id}")),
      price: Some(price),
      quantity: Some(qty),
      image_url: None,
    }
  }

  #[test]
  fn add_merges_lines_for_same_product() {
    let mut cart = Cart::new();
    cart.add(item("a", json!(20), json!(1)));
    cart.add(item("b", json!(5), json!(1)));
    cart.add(item("a", json!(20), json!(2)));

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.items()[0].quantity, Some(json!(3)));
  }

  #[test]
  fn set_quantity_ignores_values_below_one() {
    let mut cart = Cart::from_items(vec![item("a", json!(1), json!(2))]);
    assert!(!cart.set_quantity("a", 0));
    assert_eq!(cart.items()[0].quantity, Some(json!(2)));
    assert!(cart.set_quantity("a", 5));
    assert_eq!(cart.items()[0].quantity, Some(json!(5)));
    assert!(!cart.set_quantity("missing", 5));
  }

  #[test]
  fn remove_and_clear() {
    let mut cart = Cart::from_items(vec![item("a", json!(1), json!(1)), item("b", json!(1), json!(1))]);
    assert!(cart.remove("a"));
    assert!(!cart.remove("a"));
    assert_eq!(cart.len(), 1);
    cart.clear();
    assert!(cart.is_empty());
  }

  #[test]
  fn totals_for_reference_cart() {
    let cart = Cart::from_items(vec![item("tee", json!(20), json!(2)), item("shoes", json!(75), json!(1))]);
    assert_eq!(cart.charge_amount_cents().unwrap(), 11500);
    assert_eq!(cart.total().unwrap(), Decimal::from(115));
  }

  #[test]
  fn invalid_price_is_reported() {
    let cart = Cart::from_items(vec![item("a", json!(10), json!(1)), item("b", json!(-1), json!(1))]);
    assert!(matches!(cart.charge_amount_cents(), Err(CheckoutError::InvalidCart(_))));
  }

  #[test]
  fn add_product_copies_catalog_fields() {
    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      name: "Chalk Bag".to_string(),
      description: String::new(),
      price: Decimal::from_str("15.50").unwrap(),
      image_url: "https://img/chalk.png".to_string(),
      categories: vec!["Accessories".to_string()],
      created_at: now,
      updated_at: now,
    };
    let mut cart = Cart::new();
    cart.add_product(&product, 2);
    cart.add_product(&product, 1);

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.charge_amount_cents().unwrap(), 4650);
    assert_eq!(cart.items()[0].image_url.as_deref(), Some("https://img/chalk.png"));
  }
}
