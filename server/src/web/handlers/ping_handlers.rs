// server/src/web/handlers/ping_handlers.rs

use actix_web::HttpResponse;
use chrono::Utc;
use serde_json::json;
use tracing::instrument;

/// Liveness probe. Never touches a backing store.
#[instrument(name = "handler::ping")]
pub async fn ping_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({
      "ok": true,
      "time": Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
  }))
}
