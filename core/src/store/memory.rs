// core/src/store/memory.rs
use super::{OrderStore, ProductStore, UserStore};
use crate::error::StoreError;
use crate::models::{Order, Product, User};
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

/// Vec-backed catalog. Insertion order stands in for creation time.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
  products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
  async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, StoreError> {
    let guard = self.products.read();
    Ok(
      guard
        .iter()
        .rev()
        .filter(|p| category.map_or(true, |c| p.in_category(c)))
        .cloned()
        .collect(),
    )
  }

  async fn get(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
    Ok(self.products.read().iter().find(|p| p.id == id).cloned())
  }

  async fn insert(&self, product: Product) -> Result<Product, StoreError> {
    self.products.write().push(product.clone());
    Ok(product)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
    let mut guard = self.products.write();
    let before = guard.len();
    guard.retain(|p| p.id != id);
    Ok(guard.len() != before)
  }

  async fn count(&self) -> Result<u64, StoreError> {
    Ok(self.products.read().len() as u64)
  }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
  users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserStore for MemoryUserStore {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
    Ok(self.users.read().iter().find(|u| u.email == email).cloned())
  }

  async fn insert(&self, user: User) -> Result<User, StoreError> {
    let mut guard = self.users.write();
    if guard.iter().any(|u| u.email == user.email) {
      return Err(StoreError::Conflict("Email already in use".to_string()));
    }
    guard.push(user.clone());
    Ok(user)
  }
}

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
  orders: RwLock<Vec<Order>>,
}

impl MemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.orders.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.orders.read().is_empty()
  }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
  async fn insert(&self, order: Order) -> Result<Order, StoreError> {
    self.orders.write().push(order.clone());
    Ok(order)
  }

  async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
    Ok(self.orders.read().iter().rev().cloned().collect())
  }

  async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, StoreError> {
    Ok(
      self
        .orders
        .read()
        .iter()
        .rev()
        .filter(|o| o.user.id == customer_id)
        .cloned()
        .collect(),
    )
  }
}
