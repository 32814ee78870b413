// app/src/services/images.rs

//! Product image hosting port.

use async_trait::async_trait;
use serde::Serialize;
use storefront::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
  #[error("Image uploads are not configured")]
  NotConfigured,

  #[error("No file provided")]
  MissingFile,

  #[error("image host rejected the upload: {0}")]
  Rejected(String),

  #[error("image host unavailable: {source}")]
  Unavailable {
    #[source]
    source: anyhow::Error,
  },
}

impl UploadError {
  pub fn unavailable(err: impl Into<anyhow::Error>) -> Self {
    UploadError::Unavailable { source: err.into() }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      UploadError::MissingFile => ErrorKind::Validation,
      UploadError::NotConfigured | UploadError::Rejected(_) | UploadError::Unavailable { .. } => ErrorKind::Dependency,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
  pub url: String,
  pub public_id: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
  async fn upload(&self, file_name: Option<String>, bytes: Vec<u8>) -> Result<UploadedImage, UploadError>;
}

/// Used when no image host credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledImageStore;

#[async_trait]
impl ImageStore for DisabledImageStore {
  async fn upload(&self, _file_name: Option<String>, _bytes: Vec<u8>) -> Result<UploadedImage, UploadError> {
    Err(UploadError::NotConfigured)
  }
}
