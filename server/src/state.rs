// server/src/state.rs
use crate::config::AppConfig;
use std::sync::Arc;
use vendor_bridge::{Backends, VendorService};

#[derive(Clone)]
pub struct AppState {
  /// One service per process; it owns the shared rating cache.
  pub vendors: Arc<VendorService>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(backends: Backends, config: AppConfig) -> Self {
    let backends = if config.catalog_enabled {
      backends
    } else {
      tracing::warn!("Catalog disabled by configuration; catalog-backed routes will fail.");
      backends.without_catalog()
    };
    let vendors = VendorService::new(backends, config.to_bridge_config());
    Self {
      vendors: Arc::new(vendors),
      config: Arc::new(config),
    }
  }
}
