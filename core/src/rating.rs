// core/src/rating.rs

//! Time-bounded cache of per-vendor average ratings.
//!
//! A rating is the mean of the average ratings of the vendor's published products, counting
//! only products that have been rated (a zero average means "no reviews yet"). Entries live for
//! a fixed TTL and are never invalidated early, so a fresh review can take up to one TTL to
//! show. Concurrent misses for the same vendor may both recompute; the last write wins, which
//! is harmless because the computation is deterministic.

use crate::error::BridgeResult;
use crate::store::{AccountId, CatalogStore, ProductQuery, ProductStatus};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Upper bound of the product rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Entry count at which a write first sweeps out expired entries.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct CachedRating {
  value: f64,
  stored_at: Instant,
}

#[derive(Debug)]
pub struct RatingCache {
  ttl: Duration,
  prune_threshold: usize,
  entries: RwLock<HashMap<AccountId, CachedRating>>,
}

impl RatingCache {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      prune_threshold: DEFAULT_PRUNE_THRESHOLD,
      entries: RwLock::new(HashMap::new()),
    }
  }

  pub fn with_prune_threshold(mut self, threshold: usize) -> Self {
    self.prune_threshold = threshold.max(1);
    self
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Returns the cached rating if one is still fresh.
  pub fn peek(&self, vendor_id: AccountId) -> Option<f64> {
    let entries = self.entries.read();
    entries
      .get(&vendor_id)
      .filter(|entry| entry.stored_at.elapsed() < self.ttl)
      .map(|entry| entry.value)
  }

  #[instrument(name = "RatingCache::get_rating", skip(self, catalog))]
  pub async fn get_rating(&self, catalog: &dyn CatalogStore, vendor_id: AccountId) -> BridgeResult<f64> {
    if let Some(value) = self.peek(vendor_id) {
      debug!(rating = value, "Rating cache hit.");
      return Ok(value);
    }

    let value = compute_rating(catalog, vendor_id).await?;
    let mut entries = self.entries.write();
    if entries.len() >= self.prune_threshold {
      let before = entries.len();
      entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
      debug!(pruned = before - entries.len(), "Expired ratings swept.");
    }
    entries.insert(
      vendor_id,
      CachedRating {
        value,
        stored_at: Instant::now(),
      },
    );
    drop(entries);
    debug!(rating = value, "Rating cache miss, recomputed.");
    Ok(value)
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Default for RatingCache {
  fn default() -> Self {
    Self::new(crate::config::DEFAULT_RATING_TTL)
  }
}

async fn compute_rating(catalog: &dyn CatalogStore, vendor_id: AccountId) -> BridgeResult<f64> {
  let ids = catalog
    .product_ids(&ProductQuery::by_author(vendor_id).with_statuses(vec![ProductStatus::Publish]))
    .await?;
  if ids.is_empty() {
    return Ok(0.0);
  }

  let mut ratings = Vec::with_capacity(ids.len());
  for id in ids {
    // Products that vanished between the two reads are skipped.
    if let Some(product) = catalog.product(id).await? {
      ratings.push(product.average_rating);
    }
  }
  Ok(mean_of_rated(&ratings))
}

/// Mean over strictly positive ratings, clamped to the rating scale. No rated entries gives 0.
pub fn mean_of_rated(ratings: &[f64]) -> f64 {
  let rated: Vec<f64> = ratings.iter().copied().filter(|r| r.is_finite() && *r > 0.0).collect();
  if rated.is_empty() {
    return 0.0;
  }
  let mean = rated.iter().sum::<f64>() / rated.len() as f64;
  mean.clamp(0.0, MAX_RATING)
}
