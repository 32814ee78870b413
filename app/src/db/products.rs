// app/src/db/products.rs

use super::store_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use storefront::store::ProductStore;
use storefront::{Product, StoreError};
use tracing::instrument;
use uuid::Uuid;

const COLUMNS: &str = "id, name, description, price, image_url, categories, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  description: String,
  price: Decimal,
  image_url: String,
  categories: Vec<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      description: row.description,
      price: row.price,
      image_url: row.image_url,
      categories: row.categories,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, Clone)]
pub struct PgProductStore {
  pool: PgPool,
}

impl PgProductStore {
  pub fn new(pool: PgPool) -> Self {
    PgProductStore { pool }
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  #[instrument(name = "db::products::list", skip(self), err(Display))]
  async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, StoreError> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "SELECT {COLUMNS} FROM products WHERE $1::text IS NULL OR $1 = ANY(categories) ORDER BY created_at DESC"
    ))
    .bind(category)
    .fetch_all(&self.pool)
    .await
    .map_err(store_error)?;
    Ok(rows.into_iter().map(Product::from).collect())
  }

  #[instrument(name = "db::products::get", skip(self), err(Display))]
  async fn get(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error)?;
    Ok(row.map(Product::from))
  }

  #[instrument(name = "db::products::insert", skip_all, fields(product_id = %product.id), err(Display))]
  async fn insert(&self, product: Product) -> Result<Product, StoreError> {
    let row: ProductRow = sqlx::query_as(&format!(
      "INSERT INTO products ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {COLUMNS}"
    ))
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image_url)
    .bind(&product.categories)
    .bind(product.created_at)
    .bind(product.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(store_error)?;
    Ok(row.into())
  }

  #[instrument(name = "db::products::delete", skip(self), err(Display))]
  async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(store_error)?;
    Ok(result.rows_affected() > 0)
  }

  async fn count(&self) -> Result<u64, StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
      .fetch_one(&self.pool)
      .await
      .map_err(store_error)?;
    Ok(u64::try_from(count).unwrap_or_default())
  }
}
