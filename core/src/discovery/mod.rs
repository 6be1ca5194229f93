// core/src/discovery/mod.rs

//! Strategies that decide *which* vendors a listing shows and in what order.
//!
//! Each strategy yields accounts in their final order; projection into vendor records happens
//! afterwards in [`crate::service`]. Ids are never repeated within one result.
//!
//! - [`role`]: accounts holding any of the requested roles, display-name order, paged by the
//!   account store itself.
//! - [`authorship`]: authors of published products, most products first, paged in memory.
//! - [`search`]: account-field matches united with store-name matches, optionally restricted to
//!   vendors with published products.
//! - [`sections`]: featured / new / top-rated lists, each bounded by a limit.

pub mod authorship;
pub mod role;
pub mod search;
pub mod sections;

use crate::error::BridgeResult;
use crate::store::{AccountId, AccountQuery, AccountRecord, Backends, CatalogStore, ProductQuery, ProductStatus};
use std::collections::HashMap;

pub use authorship::{discover_by_authorship, rank_authors, AuthorshipPage};
pub use role::{discover_by_role, RoleFilter};
pub use search::{discover_by_search, search_vendor_ids, SearchQuery};
pub use sections::{discover_sections, AccountSections, RatedAccount, SectionsQuery};

/// One existence query against the catalog.
pub async fn has_published_products(catalog: &dyn CatalogStore, vendor_id: AccountId) -> BridgeResult<bool> {
  let ids = catalog
    .product_ids(
      &ProductQuery::by_author(vendor_id)
        .with_statuses(vec![ProductStatus::Publish])
        .limited(1, 1),
    )
    .await?;
  Ok(!ids.is_empty())
}

/// Keeps, in order, only the accounts that have at least one published product.
pub(crate) async fn retain_with_products(
  catalog: &dyn CatalogStore,
  accounts: Vec<AccountRecord>,
) -> BridgeResult<Vec<AccountRecord>> {
  let mut kept = Vec::with_capacity(accounts.len());
  for account in accounts {
    if has_published_products(catalog, account.id).await? {
      kept.push(account);
    }
  }
  Ok(kept)
}

/// Loads the accounts for `ids` and returns them in exactly that order.
///
/// Stores are asked to preserve the include order, but the result is re-sorted here anyway so a
/// backend that ignores the hint cannot reorder a ranked page. Ids without an account are dropped.
pub async fn hydrate(backends: &Backends, ids: &[AccountId]) -> BridgeResult<Vec<AccountRecord>> {
  if ids.is_empty() {
    return Ok(Vec::new());
  }
  let page = backends.accounts.query(&AccountQuery::default().including(ids.to_vec())).await?;
  let position: HashMap<AccountId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
  let mut accounts: Vec<AccountRecord> = page
    .accounts
    .into_iter()
    .filter(|a| position.contains_key(&a.id))
    .collect();
  accounts.sort_by_key(|a| position[&a.id]);
  accounts.dedup_by_key(|a| a.id);
  Ok(accounts)
}
