// app/src/errors.rs

use crate::services::images::UploadError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::{CatalogError, CheckoutError, ErrorKind, IdentityError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error(transparent)]
  Checkout(#[from] CheckoutError),

  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error(transparent)]
  Identity(#[from] IdentityError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Upload(#[from] UploadError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(format!("{:#}", err))
  }
}

impl AppError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      AppError::Validation(_) => ErrorKind::Validation,
      AppError::NotFound(_) => ErrorKind::NotFound,
      AppError::Checkout(e) => e.kind(),
      AppError::Catalog(e) => e.kind(),
      AppError::Identity(e) => e.kind(),
      AppError::Store(e) => e.kind(),
      AppError::Upload(e) => e.kind(),
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => ErrorKind::Dependency,
    }
  }

  /// What the client sees. Dependency failures are logged in full and
  /// answered with a generic message, except for upload configuration.
  pub fn client_message(&self) -> String {
    match (self.kind(), self) {
      (_, AppError::Upload(UploadError::NotConfigured)) => self.to_string(),
      (ErrorKind::Dependency, AppError::Checkout(CheckoutError::Payment(_))) => "Payment intent failed".to_string(),
      (ErrorKind::Dependency, AppError::Upload(_)) => "Upload failed".to_string(),
      (ErrorKind::Dependency, _) => "Internal server error".to_string(),
      _ => self.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self.kind() {
      ErrorKind::Validation => StatusCode::BAD_REQUEST,
      ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
      ErrorKind::Authorization => StatusCode::FORBIDDEN,
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::Dependency => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Request rejected");
    }
    HttpResponse::build(status).json(json!({ "message": self.client_message() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
