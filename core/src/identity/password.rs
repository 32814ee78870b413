// core/src/identity/password.rs

//! Argon2 password hashing and verification.

use crate::error::IdentityError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use tracing::{debug, error, instrument};

/// Hashes `password` with a fresh random salt and default Argon2 parameters.
#[instrument(name = "password::hash", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
  if password.is_empty() {
    return Err(IdentityError::MissingCredentials);
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      IdentityError::Hashing(e.to_string())
    })
}

/// `Ok(false)` on a mismatch. A stored hash that does not parse is a
/// dependency failure, not a credential failure.
#[instrument(
  name = "password::verify",
  skip(stored_hash, provided),
  fields(hash_len = stored_hash.len()),
  err(Display)
)]
pub fn verify_password(stored_hash: &str, provided: &str) -> Result<bool, IdentityError> {
  if provided.is_empty() {
    return Ok(false);
  }

  let parsed = PasswordHash::new(stored_hash).map_err(|e| {
    error!(error = %e, "Stored password hash is malformed.");
    IdentityError::Hashing(format!("invalid stored hash: {e}"))
  })?;

  match Argon2::default().verify_password(provided.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password mismatch.");
      Ok(false)
    }
    Err(e) => Err(IdentityError::Hashing(e.to_string())),
  }
}
