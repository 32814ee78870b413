// tests/catalog_tests.rs
mod common;

use common::*;
use rust_decimal::Decimal;
use serde_json::json;
use serial_test::serial;
use std::str::FromStr;
use std::sync::Arc;
use storefront::store::memory::MemoryProductStore;
use storefront::{Cart, Catalog, CatalogError, CheckoutSettings, ErrorKind, NewProductInput};

fn catalog() -> Catalog {
  Catalog::new(Arc::new(MemoryProductStore::new()))
}

fn input(name: &str, price: serde_json::Value, categories: serde_json::Value) -> NewProductInput {
  NewProductInput {
    name: Some(name.to_string()),
    description: None,
    price: Some(price),
    image_url: None,
    categories: Some(categories),
  }
}

#[tokio::test]
#[serial]
async fn create_normalizes_input() {
  setup_tracing();
  let catalog = catalog();
  let product = catalog
    .create(input("  Grip Shoes ", json!("75.50"), json!("Footwear, Sale ,Footwear")))
    .await
    .unwrap();

  assert_eq!(product.name, "Grip Shoes");
  assert_eq!(product.price, Decimal::from_str("75.50").unwrap());
  assert_eq!(product.categories, vec!["Footwear", "Sale"]);
  assert_eq!(product.description, "");
  assert_eq!(product.image_url, "");
  assert_eq!(catalog.get(product.id).await.unwrap(), product);
}

#[tokio::test]
#[serial]
async fn create_validates_name_and_price() {
  setup_tracing();
  let catalog = catalog();

  let err = catalog.create(input("  ", json!(5), json!([]))).await.unwrap_err();
  assert!(matches!(err, CatalogError::InvalidName));
  assert_eq!(err.to_string(), "Name required");

  for bad in [json!(-1), json!("ten"), json!(""), json!(null), json!("1000000000000000000000000000")] {
    let err = catalog.create(input("Tee", bad, json!([]))).await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidPrice));
    assert_eq!(err.kind(), ErrorKind::Validation);
  }

  let free = catalog.create(input("Sticker", json!(0), json!([]))).await.unwrap();
  assert_eq!(free.price, Decimal::ZERO);
}

#[tokio::test]
#[serial]
async fn list_is_newest_first_and_filters_by_exact_category() {
  setup_tracing();
  let catalog = catalog();
  let tee = catalog.create(input("Tee", json!(20), json!(["Clothing"]))).await.unwrap();
  let shoes = catalog.create(input("Shoes", json!(75), json!(["Footwear"]))).await.unwrap();
  let socks = catalog
    .create(input("Socks", json!(5), json!(["Clothing", "Footwear"])))
    .await
    .unwrap();

  let all = catalog.list(None).await.unwrap();
  assert_eq!(
    all.iter().map(|p| p.id).collect::<Vec<_>>(),
    vec![socks.id, shoes.id, tee.id]
  );

  let clothing = catalog.list(Some("Clothing")).await.unwrap();
  assert_eq!(clothing.iter().map(|p| p.id).collect::<Vec<_>>(), vec![socks.id, tee.id]);

  assert!(catalog.list(Some("cloth")).await.unwrap().is_empty());
  assert_eq!(catalog.list(Some("")).await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn delete_is_idempotent_and_get_reports_missing() {
  setup_tracing();
  let catalog = catalog();
  let tee = catalog.create(input("Tee", json!(20), json!([]))).await.unwrap();

  catalog.delete(tee.id).await.unwrap();
  catalog.delete(tee.id).await.unwrap();

  assert!(catalog.list(None).await.unwrap().is_empty());
  let err = catalog.get(tee.id).await.unwrap_err();
  assert!(matches!(err, CatalogError::NotFound(id) if id == tee.id));
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[serial]
async fn deleted_product_still_shows_in_past_orders() {
  setup_tracing();
  let catalog = catalog();
  let h = checkout_harness(CheckoutSettings::default());
  let tee = catalog.create(input("Starter Tee", json!(20), json!(["Clothing"]))).await.unwrap();

  let mut cart = Cart::new();
  cart.add_product(&tee, 3);
  let order = h.orchestrator.create_order(Some(&customer()), &cart, Some("pi_1")).await.unwrap();

  catalog.delete(tee.id).await.unwrap();

  assert!(catalog.list(None).await.unwrap().is_empty());
  assert_eq!(order.items[0].name, "Starter Tee");
  assert_eq!(order.items[0].product_id, tee.id.to_string());
  assert_eq!(order.total.to_string(), "60.00");
}
