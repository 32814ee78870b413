// core/src/store/mod.rs

//! Persistence ports. The server wires Postgres implementations; tests and
//! local runs use the in-memory ones from [`memory`].

pub mod memory;

use crate::error::StoreError;
use crate::models::{Order, Product, User};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ProductStore: Send + Sync {
  /// Newest first. With `Some(category)`, only products tagged with it.
  async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, StoreError>;

  async fn get(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

  async fn insert(&self, product: Product) -> Result<Product, StoreError>;

  /// Returns `true` if a row was removed.
  async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

  async fn count(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

  /// Fails with `StoreError::Conflict` when the email is already taken.
  async fn insert(&self, user: User) -> Result<User, StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn insert(&self, order: Order) -> Result<Order, StoreError>;

  /// Newest first.
  async fn list_all(&self) -> Result<Vec<Order>, StoreError>;

  /// Newest first.
  async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, StoreError>;
}
