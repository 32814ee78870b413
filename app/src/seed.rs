// app/src/seed.rs

//! Optional startup seeding: sample catalog and an admin account.

use crate::errors::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::identity::password;
use storefront::store::{ProductStore, UserStore};
use storefront::{Product, Role, StoreError, User};
use tracing::{info, instrument};
use uuid::Uuid;

const SAMPLE_PRODUCTS: &[(&str, &str, i64, &str)] = &[
  ("Starter Tee", "Soft cotton tee for everyday training.", 20, "Clothing"),
  ("Grip Shoes", "Sticky-soled shoes for the wall.", 75, "Footwear"),
  ("Chalk Bag", "Drawstring chalk bag with belt loop.", 15, "Accessories"),
];

/// Inserts the sample products into an empty catalog. Returns how many were added.
#[instrument(name = "seed::products", skip_all, err(Display))]
pub async fn seed_products(products: &Arc<dyn ProductStore>) -> Result<usize> {
  if products.count().await? > 0 {
    info!("Catalog already populated, skipping product seed.");
    return Ok(0);
  }

  for (name, description, price, category) in SAMPLE_PRODUCTS {
    let now = Utc::now();
    products
      .insert(Product {
        id: Uuid::new_v4(),
        name: (*name).to_string(),
        description: (*description).to_string(),
        price: Decimal::from(*price),
        image_url: String::new(),
        categories: vec![(*category).to_string()],
        created_at: now,
        updated_at: now,
      })
      .await?;
  }
  info!(count = SAMPLE_PRODUCTS.len(), "Seeded sample products.");
  Ok(SAMPLE_PRODUCTS.len())
}

/// Creates the admin account unless the email is already registered.
/// Returns `true` when a user was created.
#[instrument(name = "seed::admin", skip(users, admin_password), err(Display))]
pub async fn ensure_admin(users: &Arc<dyn UserStore>, admin_email: &str, admin_password: &str) -> Result<bool> {
  if users.find_by_email(admin_email).await?.is_some() {
    info!("Admin account already exists.");
    return Ok(false);
  }

  let now = Utc::now();
  let created = users
    .insert(User {
      id: Uuid::new_v4(),
      name: "Admin".to_string(),
      email: admin_email.to_string(),
      password_hash: password::hash_password(admin_password)?,
      role: Role::Admin,
      created_at: now,
      updated_at: now,
    })
    .await;
  match created {
    Ok(user) => {
      info!(user_id = %user.id, "Seeded admin account.");
      Ok(true)
    }
    // Another instance seeded it between the lookup and the insert.
    Err(StoreError::Conflict(_)) => Ok(false),
    Err(e) => Err(e.into()),
  }
}
