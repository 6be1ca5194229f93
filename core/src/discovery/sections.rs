// core/src/discovery/sections.rs

//! Featured / new / top-rated vendor lists for discovery screens.
//!
//! The "has published products" check cannot be pushed into the account query, so each list
//! asks the account store for more candidates than it needs, filters, then trims to `limit`.
//! When filtering removes more than the extra margin a list comes back shorter than `limit`;
//! that is accepted behavior.

use super::retain_with_products;
use crate::error::BridgeResult;
use crate::rating::RatingCache;
use crate::store::{AccountOrderBy, AccountQuery, AccountRecord, Backends, MetaCompare, SortOrder};
use crate::vendor::keys;
use tracing::{debug, instrument};

pub const FEATURED_OVERFETCH: usize = 2;
pub const NEW_OVERFETCH: usize = 2;
pub const TOP_RATED_OVERFETCH: usize = 6;

pub const DEFAULT_SECTION_LIMIT: usize = 12;
pub const MAX_SECTION_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionsQuery {
  pub limit: usize,
  pub with_products_only: bool,
}

impl SectionsQuery {
  /// `limit` is clamped to `1..=MAX_SECTION_LIMIT`.
  pub fn new(limit: i64, with_products_only: bool) -> Self {
    Self {
      limit: (limit.max(1) as usize).min(MAX_SECTION_LIMIT),
      with_products_only,
    }
  }
}

impl Default for SectionsQuery {
  fn default() -> Self {
    Self::new(DEFAULT_SECTION_LIMIT as i64, true)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatedAccount {
  pub account: AccountRecord,
  pub rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSections {
  pub featured: Vec<AccountRecord>,
  pub new: Vec<AccountRecord>,
  pub top_rated: Vec<RatedAccount>,
}

#[instrument(name = "discovery::sections", skip(backends, ratings))]
pub async fn discover_sections(
  backends: &Backends,
  ratings: &RatingCache,
  query: SectionsQuery,
) -> BridgeResult<AccountSections> {
  let featured = bounded_list(
    backends,
    AccountQuery::default()
      .with_meta(keys::FEATURED, "1", MetaCompare::Equals)
      .ordered_by(AccountOrderBy::DisplayName, SortOrder::Asc),
    FEATURED_OVERFETCH,
    query,
  )
  .await?;

  let new = bounded_list(
    backends,
    AccountQuery::default().ordered_by(AccountOrderBy::Registered, SortOrder::Desc),
    NEW_OVERFETCH,
    query,
  )
  .await?;

  let top_rated = top_rated(backends, ratings, query).await?;

  debug!(
    featured = featured.len(),
    new = new.len(),
    top_rated = top_rated.len(),
    "Sections discovery done."
  );
  Ok(AccountSections {
    featured,
    new,
    top_rated,
  })
}

async fn candidates(
  backends: &Backends,
  base: AccountQuery,
  overfetch: usize,
  query: SectionsQuery,
) -> BridgeResult<Vec<AccountRecord>> {
  let page = backends.accounts.query(&base.limited(query.limit * overfetch, 1)).await?;
  if query.with_products_only {
    retain_with_products(backends.catalog()?, page.accounts).await
  } else {
    Ok(page.accounts)
  }
}

async fn bounded_list(
  backends: &Backends,
  base: AccountQuery,
  overfetch: usize,
  query: SectionsQuery,
) -> BridgeResult<Vec<AccountRecord>> {
  let mut accounts = candidates(backends, base, overfetch, query).await?;
  accounts.truncate(query.limit);
  Ok(accounts)
}

async fn top_rated(backends: &Backends, ratings: &RatingCache, query: SectionsQuery) -> BridgeResult<Vec<RatedAccount>> {
  let catalog = backends.catalog()?;
  let pool = candidates(
    backends,
    AccountQuery::default().ordered_by(AccountOrderBy::Login, SortOrder::Asc),
    TOP_RATED_OVERFETCH,
    query,
  )
  .await?;

  let mut ranked = Vec::with_capacity(pool.len());
  for account in pool {
    let rating = ratings.get_rating(catalog, account.id).await?;
    ranked.push(RatedAccount { account, rating });
  }
  // sort_by is stable: equal ratings keep candidate order.
  ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
  ranked.truncate(query.limit);
  Ok(ranked)
}
