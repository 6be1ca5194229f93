// server/src/lib.rs

//! HTTP surface of the vendor marketplace bridge: configuration, backing-store selection and
//! the actix-web routes.

pub mod config;
pub mod db;
pub mod errors;
pub mod state;
pub mod web;

use crate::config::{AppConfig, StoreBackend};
use crate::db::{load_seed_file, PgStore};
use crate::errors::{AppError, Result};
use crate::state::AppState;
use std::sync::Arc;
use vendor_bridge::{Backends, InMemoryStore};

/// Connects the configured backend and builds the shared application state.
pub async fn build_state(config: AppConfig) -> Result<AppState> {
  let backends = match config.store_backend {
    StoreBackend::Postgres => {
      let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
      let store = PgStore::connect(database_url).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to the database.");
        AppError::Sqlx(e)
      })?;
      tracing::info!("Successfully connected to the database.");
      Backends::from_store(Arc::new(store))
    }
    StoreBackend::Memory => {
      let store = match &config.seed_file {
        Some(path) => load_seed_file(path)?,
        None => {
          tracing::warn!("No SEED_FILE configured; serving an empty in-memory store.");
          InMemoryStore::new()
        }
      };
      Backends::from_store(Arc::new(store))
    }
  };
  Ok(AppState::new(backends, config))
}
