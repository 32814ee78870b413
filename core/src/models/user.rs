// core/src/models/user.rs

use crate::error::IdentityError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The two permission levels. Every privileged operation goes through
/// [`Principal::require`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::User => "user",
      Role::Admin => "admin",
    }
  }

  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "user" => Some(Role::User),
      "admin" => Some(Role::Admin),
      _ => None,
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub role: Role,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// What the API returns for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
  pub id: String,
  pub email: String,
  pub name: String,
  pub role: Role,
}

impl From<&User> for PublicUser {
  fn from(user: &User) -> Self {
    PublicUser {
      id: user.id.to_string(),
      email: user.email.clone(),
      name: user.name.clone(),
      role: user.role,
    }
  }
}

/// The caller, as established from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
  pub id: String,
  pub email: String,
  #[serde(default)]
  pub name: String,
  pub role: Role,
}

impl Principal {
  /// Succeeds when the principal holds at least `role`.
  pub fn require(&self, role: Role) -> Result<(), IdentityError> {
    match (role, self.role) {
      (Role::User, _) | (Role::Admin, Role::Admin) => Ok(()),
      (Role::Admin, Role::User) => Err(IdentityError::Forbidden),
    }
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }
}

impl From<&User> for Principal {
  fn from(user: &User) -> Self {
    Principal {
      id: user.id.to_string(),
      email: user.email.clone(),
      name: user.name.clone(),
      role: user.role,
    }
  }
}
