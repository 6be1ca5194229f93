// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use vendor_bridge::BridgeError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Bridge(#[from] BridgeError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Allow anyhow::Error to be converted into AppError for convenience in start-up code
// that uses `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    let err = match err.downcast::<BridgeError>() {
      Ok(bridge) => return AppError::Bridge(bridge),
      Err(err) => err,
    };
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl AppError {
  /// Stable, machine-readable code placed in every error body.
  pub fn code(&self) -> &'static str {
    match self {
      AppError::Bridge(inner) => inner.code(),
      AppError::Config(_) => "CONFIG",
      AppError::Sqlx(_) => "STORE_FAILURE",
      AppError::Internal(_) => "INTERNAL",
    }
  }

  /// Client-facing message. Store and internal failures never leak their details.
  fn public_message(&self) -> String {
    match self {
      AppError::Bridge(BridgeError::Store { .. }) | AppError::Sqlx(_) => "Backing store operation failed".to_string(),
      AppError::Bridge(BridgeError::Internal(_)) | AppError::Internal(_) => "An internal error occurred".to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Bridge(inner) => inner.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Bridge(BridgeError::NotFound(_)) => StatusCode::NOT_FOUND,
      AppError::Bridge(BridgeError::Validation(_)) => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, code = self.code(), status = status.as_u16(), "Responding with error");
    HttpResponse::build(status).json(json!({
      "code": self.code(),
      "message": self.public_message(),
      "data": { "status": status.as_u16() },
    }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
