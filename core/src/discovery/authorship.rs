// core/src/discovery/authorship.rs

use super::hydrate;
use crate::error::BridgeResult;
use crate::pagination::{paginate, Page, PageRequest};
use crate::store::{AccountId, AccountRecord, Backends, CatalogStore, ProductStatus};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// A page of authors with their published product counts.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorshipPage {
  pub accounts: Page<AccountRecord>,
  pub published_counts: HashMap<AccountId, u64>,
}

/// Every author of a published product with their count, most products first. Equal counts are
/// ordered by ascending account id so the ranking is the same on every call.
pub async fn rank_authors(catalog: &dyn CatalogStore) -> BridgeResult<Vec<(AccountId, u64)>> {
  let mut ranked = catalog.author_product_counts(ProductStatus::Publish).await?;
  ranked.retain(|(_, count)| *count > 0);
  ranked.sort_by(|(a_id, a_count), (b_id, b_count)| b_count.cmp(a_count).then(a_id.cmp(b_id)));
  Ok(ranked)
}

#[instrument(name = "discovery::by_authorship", skip(backends))]
pub async fn discover_by_authorship(backends: &Backends, request: PageRequest) -> BridgeResult<AuthorshipPage> {
  let catalog = backends.catalog()?;
  let ranked = rank_authors(catalog).await?;
  let ids: Vec<AccountId> = ranked.iter().map(|(id, _)| *id).collect();
  let slice = paginate(&ids, ids.len() as u64, request);

  let accounts = hydrate(backends, &slice.items).await?;
  debug!(
    universe = ids.len(),
    page_ids = slice.items.len(),
    hydrated = accounts.len(),
    "Authorship discovery done."
  );
  Ok(AuthorshipPage {
    accounts: slice.with_items(accounts),
    published_counts: ranked.into_iter().collect(),
  })
}
