// core/src/identity/token.rs

//! HS256 bearer tokens carrying the caller's id, email, name and role.

use crate::error::IdentityError;
use crate::models::{Principal, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct TokenSettings {
  secret: String,
  pub ttl: Duration,
}

impl TokenSettings {
  pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
    TokenSettings {
      secret: secret.into(),
      ttl,
    }
  }
}

impl std::fmt::Debug for TokenSettings {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TokenSettings")
      .field("secret", &"<redacted>")
      .field("ttl", &self.ttl)
      .finish()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub id: String,
  pub email: String,
  #[serde(default)]
  pub name: String,
  pub role: Role,
  pub iat: i64,
  pub exp: i64,
}

impl From<Claims> for Principal {
  fn from(claims: Claims) -> Self {
    Principal {
      id: claims.id,
      email: claims.email,
      name: claims.name,
      role: claims.role,
    }
  }
}

#[instrument(name = "token::issue", skip_all, fields(subject = %principal.id), err(Display))]
pub fn issue_token(settings: &TokenSettings, principal: &Principal) -> Result<String, IdentityError> {
  let now = Utc::now();
  let claims = Claims {
    id: principal.id.clone(),
    email: principal.email.clone(),
    name: principal.name.clone(),
    role: principal.role,
    iat: now.timestamp(),
    exp: (now + settings.ttl).timestamp(),
  };
  encode(
    &Header::new(Algorithm::HS256),
    &claims,
    &EncodingKey::from_secret(settings.secret.as_bytes()),
  )
  .map_err(|e| IdentityError::Signing(e.to_string()))
}

/// Checks signature and expiry.
pub fn verify_token(settings: &TokenSettings, token: &str) -> Result<Principal, IdentityError> {
  let token = token.trim();
  if token.is_empty() {
    return Err(IdentityError::MissingToken);
  }
  let data = decode::<Claims>(
    token,
    &DecodingKey::from_secret(settings.secret.as_bytes()),
    &Validation::new(Algorithm::HS256),
  )
  .map_err(|e| {
    debug!(error = %e, "Token rejected.");
    IdentityError::InvalidToken
  })?;
  Ok(data.claims.into())
}
