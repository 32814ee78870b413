// app/src/services/cloudinary.rs

//! Signed uploads to Cloudinary's image upload endpoint.

use super::images::{ImageStore, UploadError, UploadedImage};
use crate::config::CloudinaryConfig;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
  secure_url: String,
  public_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
  error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
  message: String,
}

/// Hex SHA-256 over the alphabetically sorted `key=value` pairs joined with
/// `&`, followed by the API secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
  let mut sorted = params.to_vec();
  sorted.sort_by(|a, b| a.0.cmp(b.0));
  let to_sign = sorted
    .iter()
    .map(|(k, v)| format!("{k}={v}"))
    .collect::<Vec<_>>()
    .join("&");

  let mut hasher = Sha256::new();
  hasher.update(to_sign.as_bytes());
  hasher.update(api_secret.as_bytes());
  hex::encode(hasher.finalize())
}

pub struct CloudinaryImageStore {
  client: Client,
  config: CloudinaryConfig,
  folder: String,
}

impl std::fmt::Debug for CloudinaryImageStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CloudinaryImageStore")
      .field("cloud_name", &self.config.cloud_name)
      .field("folder", &self.folder)
      .finish_non_exhaustive()
  }
}

impl CloudinaryImageStore {
  pub fn new(client: Client, config: CloudinaryConfig, folder: impl Into<String>) -> Self {
    CloudinaryImageStore {
      client,
      config,
      folder: folder.into(),
    }
  }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
  #[instrument(name = "cloudinary::upload", skip(self, bytes), fields(size = bytes.len(), folder = %self.folder), err(Display))]
  async fn upload(&self, file_name: Option<String>, bytes: Vec<u8>) -> Result<UploadedImage, UploadError> {
    if bytes.is_empty() {
      return Err(UploadError::MissingFile);
    }

    let timestamp = Utc::now().timestamp().to_string();
    let signature = sign_params(
      &[("folder", self.folder.as_str()), ("timestamp", timestamp.as_str())],
      &self.config.api_secret,
    );
    let part = Part::bytes(bytes).file_name(file_name.unwrap_or_else(|| "upload".to_string()));
    let form = Form::new()
      .part("file", part)
      .text("api_key", self.config.api_key.clone())
      .text("timestamp", timestamp)
      .text("folder", self.folder.clone())
      .text("signature", signature);

    let response = self
      .client
      .post(format!("{}/{}/image/upload", API_BASE, self.config.cloud_name))
      .multipart(form)
      .send()
      .await
      .map_err(UploadError::unavailable)?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
      warn!(status = status.as_u16(), %message, "Cloudinary upload failed.");
      return Err(if status.is_client_error() {
        UploadError::Rejected(message)
      } else {
        UploadError::unavailable(anyhow::anyhow!("cloudinary answered {}: {}", status, message))
      });
    }

    let uploaded: UploadResponse = response.json().await.map_err(UploadError::unavailable)?;
    info!(public_id = %uploaded.public_id, "Image uploaded.");
    Ok(UploadedImage {
      url: uploaded.secure_url,
      public_id: uploaded.public_id,
    })
  }
}
