// core/src/catalog.rs

//! Product catalog: listing, lookup, admin create and delete.

use crate::error::CatalogError;
use crate::models::Product;
use crate::money;
use crate::store::ProductStore;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Admin input for a new product, as posted by the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductInput {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  /// Number or numeric string.
  #[serde(default)]
  pub price: Option<Value>,
  #[serde(default)]
  pub image_url: Option<String>,
  /// A list of tags or a single comma-separated string.
  #[serde(default)]
  pub categories: Option<Value>,
}

/// Trims, drops empties and de-duplicates while keeping first-seen order.
pub fn normalize_categories(raw: Option<&Value>) -> Vec<String> {
  let candidates: Vec<String> = match raw {
    Some(Value::Array(values)) => values
      .iter()
      .filter_map(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
      })
      .collect(),
    Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
    _ => Vec::new(),
  };

  let mut out: Vec<String> = Vec::with_capacity(candidates.len());
  for tag in candidates {
    let tag = tag.trim();
    if !tag.is_empty() && !out.iter().any(|t| t == tag) {
      out.push(tag.to_string());
    }
  }
  out
}

#[derive(Clone)]
pub struct Catalog {
  products: Arc<dyn ProductStore>,
}

impl Catalog {
  pub fn new(products: Arc<dyn ProductStore>) -> Self {
    Catalog { products }
  }

  /// Newest first. A blank category means no filter.
  #[instrument(name = "catalog::list", skip(self), err(Display))]
  pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, CatalogError> {
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    Ok(self.products.list(category).await?)
  }

  #[instrument(name = "catalog::get", skip(self), err(Display))]
  pub async fn get(&self, id: Uuid) -> Result<Product, CatalogError> {
    self.products.get(id).await?.ok_or(CatalogError::NotFound(id))
  }

  #[instrument(name = "catalog::create", skip_all, err(Display))]
  pub async fn create(&self, input: NewProductInput) -> Result<Product, CatalogError> {
    let name = input
      .name
      .as_deref()
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .ok_or(CatalogError::InvalidName)?
      .to_string();
    let price = money::parse_price(input.price.as_ref()).ok_or(CatalogError::InvalidPrice)?;

    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      name,
      description: input.description.unwrap_or_default(),
      price,
      image_url: input.image_url.unwrap_or_default(),
      categories: normalize_categories(input.categories.as_ref()),
      created_at: now,
      updated_at: now,
    };
    let saved = self.products.insert(product).await?;
    info!(product_id = %saved.id, name = %saved.name, "Product created.");
    Ok(saved)
  }

  /// Unknown ids are a no-op.
  #[instrument(name = "catalog::delete", skip(self), err(Display))]
  pub async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
    if self.products.delete(id).await? {
      info!(product_id = %id, "Product deleted.");
    }
    Ok(())
  }
}

impl std::fmt::Debug for Catalog {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Catalog").finish_non_exhaustive()
  }
}
