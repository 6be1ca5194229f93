// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  DependencyMissing(String),

  #[error("{0}")]
  Validation(String),

  #[error("Backing store failure. Source: {source}")]
  Store {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal vendor-bridge error: {0}")]
  Internal(String),
}

impl BridgeError {
  /// Machine-readable code surfaced to API clients. These strings are part of the wire contract.
  pub fn code(&self) -> &'static str {
    match self {
      BridgeError::NotFound(_) => "NOT_FOUND",
      BridgeError::DependencyMissing(_) => "DEPENDENCY_MISSING",
      BridgeError::Validation(_) => "VALIDATION",
      BridgeError::Store { .. } => "STORE_FAILURE",
      BridgeError::Internal(_) => "INTERNAL",
    }
  }

  pub fn not_found(what: impl Into<String>) -> Self {
    BridgeError::NotFound(what.into())
  }

  pub fn catalog_missing() -> Self {
    BridgeError::DependencyMissing("Catalog engine is not available".to_string())
  }
}

// Accessor implementations report failures as anyhow errors; they all land in `Store`.
impl From<AnyhowError> for BridgeError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<BridgeError>() {
      Ok(bridge_err) => bridge_err,
      Err(err) => BridgeError::Store { source: err },
    }
  }
}

pub type BridgeResult<T, E = BridgeError> = std::result::Result<T, E>;
