// core/src/store/mod.rs

//! Narrow interfaces over the platform's backing stores.
//!
//! The aggregation layer never owns data: accounts live in the user directory, products and
//! comments in the catalog engine, coupons in the coupon store and every loose attribute in
//! the key/value metadata store. Each of those is reached through one of the traits below,
//! bundled into a [`Backends`] value that is passed explicitly to every strategy.

pub mod memory;
pub mod query;
pub mod record;

use crate::error::{BridgeError, BridgeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub use memory::InMemoryStore;
pub use query::{
  AccountOrderBy, AccountQuery, AccountSearch, CommentQuery, MetaCompare, MetaFilter, ProductOrderBy, ProductQuery,
  SearchColumn, SortOrder,
};
pub use record::{AccountId, AccountRecord, CommentRecord, CouponRecord, ProductId, ProductRecord, ProductStatus};

/// Which entity family a metadata key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaScope {
  Account,
  Post,
  Comment,
}

#[async_trait]
pub trait MetaStore: Send + Sync {
  async fn get(&self, scope: MetaScope, id: u64, key: &str) -> BridgeResult<Option<String>>;

  /// Fetches several keys of one entity. Absent keys are simply missing from the map.
  async fn get_many(&self, scope: MetaScope, id: u64, keys: &[&str]) -> BridgeResult<HashMap<String, String>> {
    let mut found = HashMap::with_capacity(keys.len());
    for key in keys {
      if let Some(value) = self.get(scope, id, key).await? {
        found.insert((*key).to_string(), value);
      }
    }
    Ok(found)
  }
}

/// One page of accounts plus the number of matches before paging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPage {
  pub accounts: Vec<AccountRecord>,
  pub total: u64,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
  async fn find(&self, id: AccountId) -> BridgeResult<Option<AccountRecord>>;

  async fn query(&self, query: &AccountQuery) -> BridgeResult<AccountPage>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn product(&self, id: ProductId) -> BridgeResult<Option<ProductRecord>>;

  async fn product_ids(&self, query: &ProductQuery) -> BridgeResult<Vec<ProductId>>;

  /// Products authored by `author` in any of `statuses` (every status when empty).
  async fn count_products(&self, author: AccountId, statuses: &[ProductStatus]) -> BridgeResult<u64>;

  /// `(author, product count)` for every author with at least one product in `status`.
  /// No particular order is promised.
  async fn author_product_counts(&self, status: ProductStatus) -> BridgeResult<Vec<(AccountId, u64)>>;

  async fn attachment_url(&self, attachment_id: u64) -> BridgeResult<Option<String>>;

  async fn comments(&self, query: &CommentQuery) -> BridgeResult<Vec<CommentRecord>>;

  async fn count_comments(&self, query: &CommentQuery) -> BridgeResult<u64>;
}

#[async_trait]
pub trait CouponStore: Send + Sync {
  async fn coupons_by_author(&self, author: AccountId) -> BridgeResult<Vec<CouponRecord>>;
}

/// Every accessor the aggregation layer talks to.
///
/// The catalog is optional because the commerce engine may be switched off on a site that
/// still has its user directory; operations that need it fail with `DependencyMissing`.
#[derive(Clone)]
pub struct Backends {
  pub accounts: Arc<dyn AccountStore>,
  pub meta: Arc<dyn MetaStore>,
  pub catalog: Option<Arc<dyn CatalogStore>>,
  pub coupons: Arc<dyn CouponStore>,
}

impl Backends {
  pub fn new(
    accounts: Arc<dyn AccountStore>,
    meta: Arc<dyn MetaStore>,
    catalog: Option<Arc<dyn CatalogStore>>,
    coupons: Arc<dyn CouponStore>,
  ) -> Self {
    Self {
      accounts,
      meta,
      catalog,
      coupons,
    }
  }

  /// Uses one store for every accessor.
  pub fn from_store<S>(store: Arc<S>) -> Self
  where
    S: AccountStore + MetaStore + CatalogStore + CouponStore + 'static,
  {
    Self {
      accounts: store.clone(),
      meta: store.clone(),
      catalog: Some(store.clone() as Arc<dyn CatalogStore>),
      coupons: store,
    }
  }

  pub fn without_catalog(mut self) -> Self {
    self.catalog = None;
    self
  }

  pub fn catalog(&self) -> BridgeResult<&dyn CatalogStore> {
    self.catalog.as_deref().ok_or_else(BridgeError::catalog_missing)
  }
}

impl std::fmt::Debug for Backends {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Backends")
      .field("catalog_present", &self.catalog.is_some())
      .finish()
  }
}
