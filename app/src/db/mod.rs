// app/src/db/mod.rs

//! Postgres implementations of the storefront storage ports.

pub mod orders;
pub mod products;
pub mod users;

pub use orders::PgOrderStore;
pub use products::PgProductStore;
pub use users::PgUserStore;

use crate::config::AppConfig;
use crate::errors::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use storefront::StoreError;
use tracing::{info, instrument};

#[instrument(name = "db::connect", skip_all, fields(max_connections = config.database_max_connections), err(Display))]
pub async fn connect(config: &AppConfig) -> Result<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .connect(&config.database_url)
    .await?;
  info!("Successfully connected to the database.");
  Ok(pool)
}

#[instrument(name = "db::migrate", skip_all, err(Display))]
pub async fn migrate(pool: &PgPool) -> Result<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}

/// Unique violations become `Conflict`; everything else is a backend failure.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
  if let Some(db_err) = err.as_database_error() {
    if db_err.is_unique_violation() {
      return StoreError::Conflict(db_err.message().to_string());
    }
  }
  StoreError::backend(err)
}
