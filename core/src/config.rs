// core/src/config.rs

//! Settings the aggregation layer needs from its host application.

use std::time::Duration;

/// How long a computed vendor rating stays fresh.
pub const DEFAULT_RATING_TTL: Duration = Duration::from_secs(10 * 60);

pub const DEFAULT_NAMESPACE: &str = "mk/v1";

pub const DEFAULT_AVATAR_BASE_URL: &str = "https://secure.gravatar.com/avatar";

#[derive(Debug, Clone)]
pub struct BridgeConfig {
  /// Public base URL of the storefront, without a trailing slash.
  pub site_url: String,
  /// Route namespace the API is mounted under, e.g. `mk/v1`.
  pub namespace: String,
  pub avatar_base_url: String,
  pub rating_ttl: Duration,
}

impl Default for BridgeConfig {
  fn default() -> Self {
    Self {
      site_url: "http://localhost".to_string(),
      namespace: DEFAULT_NAMESPACE.to_string(),
      avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
      rating_ttl: DEFAULT_RATING_TTL,
    }
  }
}

impl BridgeConfig {
  pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
    self.site_url = site_url.into().trim_end_matches('/').to_string();
    self
  }

  pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
    self.namespace = namespace.into().trim_matches('/').to_string();
    self
  }

  pub fn with_avatar_base_url(mut self, url: impl Into<String>) -> Self {
    self.avatar_base_url = url.into().trim_end_matches('/').to_string();
    self
  }

  pub fn with_rating_ttl(mut self, ttl: Duration) -> Self {
    self.rating_ttl = ttl;
    self
  }

  /// Absolute URL of an API route, e.g. `api_url("vendors/7")`.
  pub fn api_url(&self, route: &str) -> String {
    format!("{}/wp-json/{}/{}", self.site_url, self.namespace, route.trim_start_matches('/'))
  }
}
