// server/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use vendor_bridge::config::{DEFAULT_AVATAR_BASE_URL, DEFAULT_NAMESPACE, DEFAULT_RATING_TTL};
use vendor_bridge::BridgeConfig;

/// Where vendor data is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(raw: &str) -> Result<Self> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
      "memory" | "in-memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Required for the postgres backend only.
  pub database_url: Option<String>,
  /// JSON fixture loaded by the memory backend; an empty store when unset.
  pub seed_file: Option<PathBuf>,
  pub site_url: String,
  pub api_namespace: String,
  pub rating_cache_ttl: Duration,
  /// When false the commerce catalog is treated as unavailable.
  pub catalog_enabled: bool,
  pub avatar_base_url: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = match get_env("STORE_BACKEND") {
      Some(raw) => raw.parse::<StoreBackend>()?,
      None => StoreBackend::Postgres,
    };
    let database_url = get_env("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required by the postgres backend)".to_string(),
      ));
    }
    let seed_file = get_env("SEED_FILE").map(PathBuf::from);

    let site_url = get_env("SITE_URL")
      .unwrap_or_else(|| format!("http://{}:{}", server_host, server_port))
      .trim_end_matches('/')
      .to_string();
    let api_namespace = get_env("API_NAMESPACE")
      .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
      .trim_matches('/')
      .to_string();
    if api_namespace.is_empty() {
      return Err(AppError::Config("API_NAMESPACE must not be empty".to_string()));
    }

    let rating_cache_ttl = match get_env("RATING_CACHE_TTL_SECS") {
      Some(raw) => Duration::from_secs(
        raw
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid RATING_CACHE_TTL_SECS: {}", e)))?,
      ),
      None => DEFAULT_RATING_TTL,
    };
    let catalog_enabled = get_env("CATALOG_ENABLED")
      .unwrap_or_else(|| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid CATALOG_ENABLED value: {}", e)))?;
    let avatar_base_url = get_env("AVATAR_BASE_URL")
      .unwrap_or_else(|| DEFAULT_AVATAR_BASE_URL.to_string())
      .trim_end_matches('/')
      .to_string();

    tracing::info!(
      backend = ?store_backend,
      namespace = %api_namespace,
      catalog_enabled,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      seed_file,
      site_url,
      api_namespace,
      rating_cache_ttl,
      catalog_enabled,
      avatar_base_url,
    })
  }

  /// Configuration for an in-memory deployment, used by tests and local runs.
  pub fn for_memory(site_url: impl Into<String>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      store_backend: StoreBackend::Memory,
      database_url: None,
      seed_file: None,
      site_url: site_url.into(),
      api_namespace: DEFAULT_NAMESPACE.to_string(),
      rating_cache_ttl: DEFAULT_RATING_TTL,
      catalog_enabled: true,
      avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
    }
  }

  pub fn to_bridge_config(&self) -> BridgeConfig {
    BridgeConfig::default()
      .with_site_url(self.site_url.clone())
      .with_namespace(self.api_namespace.clone())
      .with_avatar_base_url(self.avatar_base_url.clone())
      .with_rating_ttl(self.rating_cache_ttl)
  }

  /// Path prefix every API route is mounted under.
  pub fn api_prefix(&self) -> String {
    format!("/wp-json/{}", self.api_namespace)
  }
}
