// core/src/error.rs
use crate::workflow::WorkflowError;
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification every domain error maps onto. The HTTP layer turns
/// this into a status code; the `Display` text becomes the client message
/// for everything except `Dependency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  Authentication,
  Authorization,
  NotFound,
  Dependency,
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("{0}")]
  Conflict(String),

  #[error("storage backend failure: {source}")]
  Backend {
    #[source]
    source: AnyhowError,
  },
}

impl StoreError {
  pub fn backend(err: impl Into<AnyhowError>) -> Self {
    StoreError::Backend { source: err.into() }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      StoreError::Conflict(_) => ErrorKind::Validation,
      StoreError::Backend { .. } => ErrorKind::Dependency,
    }
  }
}

#[derive(Debug, Error)]
pub enum PaymentError {
  #[error("payment processor rejected the request: {0}")]
  Rejected(String),

  #[error("payment processor unavailable: {source}")]
  Unavailable {
    #[source]
    source: AnyhowError,
  },
}

impl PaymentError {
  pub fn unavailable(err: impl Into<AnyhowError>) -> Self {
    PaymentError::Unavailable { source: err.into() }
  }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("No items")]
  EmptyCart,

  #[error("Invalid price in cart: {0}")]
  InvalidCart(String),

  #[error("Total must be at least {minimum_cents} cents (got {amount_cents})")]
  BelowMinimumCharge { amount_cents: i64, minimum_cents: i64 },

  #[error("User not available on request")]
  Unauthenticated,

  #[error("Invalid item at position {index}: {reason}")]
  InvalidLineItem { index: usize, reason: String },

  #[error("Order total must be > 0")]
  ZeroTotal,

  #[error("Payment not confirmed: {0}")]
  PaymentNotConfirmed(String),

  #[error(transparent)]
  Payment(#[from] PaymentError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Workflow(#[from] WorkflowError),
}

impl CheckoutError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      CheckoutError::EmptyCart
      | CheckoutError::InvalidCart(_)
      | CheckoutError::BelowMinimumCharge { .. }
      | CheckoutError::InvalidLineItem { .. }
      | CheckoutError::ZeroTotal
      | CheckoutError::PaymentNotConfirmed(_) => ErrorKind::Validation,
      CheckoutError::Unauthenticated => ErrorKind::Authentication,
      CheckoutError::Store(e) => e.kind(),
      CheckoutError::Payment(_) | CheckoutError::Workflow(_) => ErrorKind::Dependency,
    }
  }
}

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Name required")]
  InvalidName,

  #[error("Invalid price")]
  InvalidPrice,

  #[error("Product {0} not found")]
  NotFound(Uuid),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl CatalogError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      CatalogError::InvalidName | CatalogError::InvalidPrice => ErrorKind::Validation,
      CatalogError::NotFound(_) => ErrorKind::NotFound,
      CatalogError::Store(e) => e.kind(),
    }
  }
}

#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("Email and password required")]
  MissingCredentials,

  #[error("Email already in use")]
  EmailTaken,

  #[error("Invalid credentials")]
  InvalidCredentials,

  #[error("No token provided")]
  MissingToken,

  #[error("Invalid token")]
  InvalidToken,

  #[error("Admin only")]
  Forbidden,

  #[error("password hashing failed: {0}")]
  Hashing(String),

  #[error("token signing failed: {0}")]
  Signing(String),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Workflow(#[from] WorkflowError),
}

impl IdentityError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      IdentityError::MissingCredentials | IdentityError::EmailTaken => ErrorKind::Validation,
      IdentityError::InvalidCredentials | IdentityError::MissingToken | IdentityError::InvalidToken => {
        ErrorKind::Authentication
      }
      IdentityError::Forbidden => ErrorKind::Authorization,
      IdentityError::Store(StoreError::Conflict(_)) => ErrorKind::Validation,
      IdentityError::Hashing(_) | IdentityError::Signing(_) | IdentityError::Store(_) | IdentityError::Workflow(_) => {
        ErrorKind::Dependency
      }
    }
  }
}
