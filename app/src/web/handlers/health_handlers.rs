// app/src/web/handlers/health_handlers.rs

use actix_web::HttpResponse;
use serde_json::json;

pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "ok": true }))
}
