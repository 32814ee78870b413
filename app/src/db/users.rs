// app/src/db/users.rs

use super::store_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use storefront::store::UserStore;
use storefront::{Role, StoreError, User};
use tracing::instrument;
use uuid::Uuid;

const COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

#[derive(FromRow)]
struct UserRow {
  id: Uuid,
  name: String,
  email: String,
  password_hash: String,
  role: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = StoreError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let role = Role::parse(&row.role)
      .ok_or_else(|| StoreError::backend(anyhow::anyhow!("user {} has unknown role '{}'", row.id, row.role)))?;
    Ok(User {
      id: row.id,
      name: row.name,
      email: row.email,
      password_hash: row.password_hash,
      role,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
  pool: PgPool,
}

impl PgUserStore {
  pub fn new(pool: PgPool) -> Self {
    PgUserStore { pool }
  }
}

#[async_trait]
impl UserStore for PgUserStore {
  #[instrument(name = "db::users::find_by_email", skip(self), err(Display))]
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
      .bind(email)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error)?;
    row.map(User::try_from).transpose()
  }

  #[instrument(name = "db::users::insert", skip_all, fields(user_id = %user.id), err(Display))]
  async fn insert(&self, user: User) -> Result<User, StoreError> {
    let row: UserRow = sqlx::query_as(&format!(
      "INSERT INTO users ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
    ))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(store_error)?;
    User::try_from(row)
  }
}
