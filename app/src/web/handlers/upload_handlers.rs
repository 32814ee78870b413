// app/src/web/handlers/upload_handlers.rs

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use tracing::{debug, info, instrument};

use crate::errors::AppError;
use crate::services::UploadError;
use crate::state::AppState;
use crate::web::auth::AdminUser;

struct FilePart {
  file_name: Option<String>,
  bytes: Vec<u8>,
}

/// Reads the first field named `file`; every other field is drained and ignored.
async fn read_file_field(mut payload: Multipart) -> Result<Option<FilePart>, AppError> {
  while let Some(field) = payload.next().await {
    let mut field = field.map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?;
    let is_file = field.name() == Some("file");
    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_owned);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
      let chunk = chunk.map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?;
      if is_file {
        bytes.extend_from_slice(&chunk);
      }
    }

    if is_file {
      return Ok(Some(FilePart { file_name, bytes }));
    }
    debug!(field = field.name().unwrap_or_default(), "Ignoring multipart field.");
  }
  Ok(None)
}

#[instrument(name = "handler::upload_image", skip(app_state, admin, payload), fields(admin_id = %admin.0.id))]
pub async fn upload_image_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let part = read_file_field(payload).await?.ok_or(UploadError::MissingFile)?;
  if part.bytes.is_empty() {
    return Err(UploadError::MissingFile.into());
  }

  let size = part.bytes.len();
  let uploaded = app_state.images.upload(part.file_name, part.bytes).await?;
  info!(size, public_id = %uploaded.public_id, "Image uploaded.");
  Ok(HttpResponse::Created().json(uploaded))
}
