// server/src/db/mod.rs

//! Backing-store implementations the server can run on.

pub mod postgres;

pub use postgres::PgStore;

use crate::errors::{AppError, Result};
use std::path::Path;
use vendor_bridge::InMemoryStore;

/// Loads a JSON fixture into an in-memory store.
pub fn load_seed_file(path: &Path) -> Result<InMemoryStore> {
  let raw = std::fs::read_to_string(path)
    .map_err(|e| AppError::Config(format!("Cannot read SEED_FILE '{}': {}", path.display(), e)))?;
  let store = InMemoryStore::from_json(&raw)?;
  let snapshot = store.snapshot();
  tracing::info!(
    accounts = snapshot.accounts.len(),
    products = snapshot.products.len(),
    path = %path.display(),
    "Seed data loaded."
  );
  Ok(store)
}
