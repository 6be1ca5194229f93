// core/src/discovery/search.rs

use super::{has_published_products, hydrate};
use crate::error::{BridgeError, BridgeResult};
use crate::pagination::{paginate, Page, PageRequest};
use crate::store::{AccountId, AccountOrderBy, AccountQuery, AccountRecord, Backends, MetaCompare, SearchColumn, SortOrder};
use crate::vendor::keys;
use std::collections::HashSet;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
  term: String,
  pub request: PageRequest,
  pub with_products_only: bool,
}

impl SearchQuery {
  /// Fails with `Validation` when the term is absent or blank.
  pub fn new(term: Option<&str>, request: PageRequest, with_products_only: bool) -> BridgeResult<Self> {
    let term = term.map(str::trim).unwrap_or_default();
    if term.is_empty() {
      return Err(BridgeError::Validation("Missing parameter(s): q".to_string()));
    }
    Ok(Self {
      term: term.to_string(),
      request,
      with_products_only,
    })
  }

  pub fn term(&self) -> &str {
    &self.term
  }
}

/// The complete, filtered id set for a search, account-field matches first.
///
/// With `with_products_only` every candidate costs one existence query against the catalog.
pub async fn search_vendor_ids(backends: &Backends, query: &SearchQuery) -> BridgeResult<Vec<AccountId>> {
  let by_fields = backends
    .accounts
    .query(
      &AccountQuery::default()
        .with_search(query.term(), &SearchColumn::ALL)
        .ordered_by(AccountOrderBy::DisplayName, SortOrder::Asc),
    )
    .await?;
  let by_store_name = backends
    .accounts
    .query(
      &AccountQuery::default()
        .with_meta(keys::BILLING_COMPANY, query.term(), MetaCompare::Like)
        .ordered_by(AccountOrderBy::DisplayName, SortOrder::Asc),
    )
    .await?;

  let mut seen = HashSet::new();
  let mut ids: Vec<AccountId> = by_fields
    .accounts
    .iter()
    .chain(by_store_name.accounts.iter())
    .map(|a| a.id)
    .filter(|id| seen.insert(*id))
    .collect();

  if query.with_products_only && !ids.is_empty() {
    let catalog = backends.catalog()?;
    let mut kept = Vec::with_capacity(ids.len());
    for id in ids {
      if has_published_products(catalog, id).await? {
        kept.push(id);
      }
    }
    ids = kept;
  }
  Ok(ids)
}

#[instrument(name = "discovery::by_search", skip(backends, query), fields(term = %query.term()))]
pub async fn discover_by_search(backends: &Backends, query: &SearchQuery) -> BridgeResult<Page<AccountRecord>> {
  let ids = search_vendor_ids(backends, query).await?;
  let slice = paginate(&ids, ids.len() as u64, query.request);
  let accounts = hydrate(backends, &slice.items).await?;
  debug!(matches = ids.len(), returned = accounts.len(), "Search discovery done.");
  Ok(slice.with_items(accounts))
}
