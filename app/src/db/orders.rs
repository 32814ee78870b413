// app/src/db/orders.rs

use super::store_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use storefront::store::OrderStore;
use storefront::{Order, OrderCustomer, OrderLine, OrderStatus, StoreError};
use tracing::instrument;
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, user_email, user_name, items, total, payment_reference, status, created_at";

/// JSONB shape of an order line. Prices are kept as decimal strings so the
/// snapshot never passes through a float.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredOrderLine {
  product_id: String,
  name: String,
  #[serde(with = "rust_decimal::serde::str")]
  price: Decimal,
  qty: u32,
  #[serde(default)]
  image_url: String,
}

impl From<&OrderLine> for StoredOrderLine {
  fn from(line: &OrderLine) -> Self {
    StoredOrderLine {
      product_id: line.product_id.clone(),
      name: line.name.clone(),
      price: line.unit_price,
      qty: line.quantity,
      image_url: line.image_url.clone(),
    }
  }
}

impl From<StoredOrderLine> for OrderLine {
  fn from(stored: StoredOrderLine) -> Self {
    OrderLine {
      product_id: stored.product_id,
      name: stored.name,
      unit_price: stored.price,
      quantity: stored.qty,
      image_url: stored.image_url,
    }
  }
}

#[derive(FromRow)]
struct OrderRow {
  id: Uuid,
  user_id: String,
  user_email: String,
  user_name: String,
  items: Json<Vec<StoredOrderLine>>,
  total: Decimal,
  payment_reference: String,
  status: String,
  created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = StoreError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    let status = OrderStatus::parse(&row.status)
      .ok_or_else(|| StoreError::backend(anyhow::anyhow!("order {} has unknown status '{}'", row.id, row.status)))?;
    Ok(Order {
      id: row.id,
      user: OrderCustomer {
        id: row.user_id,
        email: row.user_email,
        name: row.user_name,
      },
      items: row.items.0.into_iter().map(OrderLine::from).collect(),
      total: row.total,
      payment_reference: row.payment_reference,
      status,
      created_at: row.created_at,
    })
  }
}

fn into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, StoreError> {
  rows.into_iter().map(Order::try_from).collect()
}

#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    PgOrderStore { pool }
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  #[instrument(name = "db::orders::insert", skip_all, fields(order_id = %order.id), err(Display))]
  async fn insert(&self, order: Order) -> Result<Order, StoreError> {
    let items: Vec<StoredOrderLine> = order.items.iter().map(StoredOrderLine::from).collect();
    let row: OrderRow = sqlx::query_as(&format!(
      "INSERT INTO orders ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {COLUMNS}"
    ))
    .bind(order.id)
    .bind(&order.user.id)
    .bind(&order.user.email)
    .bind(&order.user.name)
    .bind(Json(items))
    .bind(order.total)
    .bind(&order.payment_reference)
    .bind(order.status.as_str())
    .bind(order.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(store_error)?;
    Order::try_from(row)
  }

  #[instrument(name = "db::orders::list_all", skip(self), err(Display))]
  async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC"))
      .fetch_all(&self.pool)
      .await
      .map_err(store_error)?;
    into_orders(rows)
  }

  #[instrument(name = "db::orders::list_for_customer", skip(self), err(Display))]
  async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(customer_id)
    .fetch_all(&self.pool)
    .await
    .map_err(store_error)?;
    into_orders(rows)
  }
}
