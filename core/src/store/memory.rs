// core/src/store/memory.rs

//! A self-contained store that implements every accessor over plain maps.
//!
//! It backs the test suites and benchmarks, and the server's `memory` backend seeded from a
//! JSON snapshot. Query semantics follow the SQL backend: variations never show up in product
//! listings, display-name ordering is case-insensitive with ids breaking ties.

use super::query::{AccountOrderBy, AccountQuery, CommentQuery, MetaCompare, ProductOrderBy, ProductQuery, SortOrder};
use super::record::{AccountId, AccountRecord, CommentRecord, CouponRecord, ProductId, ProductRecord, ProductStatus};
use super::{AccountPage, AccountStore, CatalogStore, CouponStore, MetaScope, MetaStore};
use crate::error::{BridgeError, BridgeResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

type MetaMap = HashMap<u64, HashMap<String, String>>;

/// Everything the in-memory store holds. This is also the JSON fixture format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
  pub accounts: Vec<AccountRecord>,
  pub products: Vec<ProductRecord>,
  pub comments: Vec<CommentRecord>,
  pub coupons: Vec<CouponRecord>,
  /// attachment id -> full-size URL
  pub attachments: HashMap<u64, String>,
  pub account_meta: MetaMap,
  pub post_meta: MetaMap,
  pub comment_meta: MetaMap,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
  data: RwLock<StoreSnapshot>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
    Self {
      data: RwLock::new(snapshot),
    }
  }

  pub fn from_json(raw: &str) -> BridgeResult<Self> {
    let snapshot: StoreSnapshot = serde_json::from_str(raw)
      .map_err(|e| BridgeError::Internal(format!("Invalid store snapshot: {}", e)))?;
    Ok(Self::from_snapshot(snapshot))
  }

  pub fn snapshot(&self) -> StoreSnapshot {
    self.data.read().clone()
  }

  pub fn insert_account(&self, account: AccountRecord) {
    let mut data = self.data.write();
    data.accounts.retain(|a| a.id != account.id);
    data.accounts.push(account);
  }

  pub fn insert_product(&self, product: ProductRecord) {
    let mut data = self.data.write();
    data.products.retain(|p| p.id != product.id);
    data.products.push(product);
  }

  pub fn insert_comment(&self, comment: CommentRecord) {
    let mut data = self.data.write();
    data.comments.retain(|c| c.id != comment.id);
    data.comments.push(comment);
  }

  pub fn insert_coupon(&self, coupon: CouponRecord) {
    let mut data = self.data.write();
    data.coupons.retain(|c| c.id != coupon.id);
    data.coupons.push(coupon);
  }

  pub fn insert_attachment(&self, id: u64, url: impl Into<String>) {
    self.data.write().attachments.insert(id, url.into());
  }

  pub fn set_meta(&self, scope: MetaScope, id: u64, key: impl Into<String>, value: impl Into<String>) {
    let mut data = self.data.write();
    let map = match scope {
      MetaScope::Account => &mut data.account_meta,
      MetaScope::Post => &mut data.post_meta,
      MetaScope::Comment => &mut data.comment_meta,
    };
    map.entry(id).or_default().insert(key.into(), value.into());
  }
}

fn meta_map(data: &StoreSnapshot, scope: MetaScope) -> &MetaMap {
  match scope {
    MetaScope::Account => &data.account_meta,
    MetaScope::Post => &data.post_meta,
    MetaScope::Comment => &data.comment_meta,
  }
}

fn account_meta<'a>(data: &'a StoreSnapshot, id: AccountId, key: &str) -> Option<&'a str> {
  data.account_meta.get(&id).and_then(|m| m.get(key)).map(String::as_str)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
  haystack.to_lowercase().contains(needle_lower)
}

fn account_matches(data: &StoreSnapshot, account: &AccountRecord, query: &AccountQuery) -> bool {
  if !query.roles.is_empty() && !account.roles.iter().any(|r| query.roles.contains(r)) {
    return false;
  }
  if let Some(include) = &query.include {
    if !include.contains(&account.id) {
      return false;
    }
  }
  if let Some(search) = &query.search {
    let term = search.term.trim_matches('*').to_lowercase();
    let hit = search.columns.iter().any(|column| {
      let value = match column {
        super::SearchColumn::Login => &account.login,
        super::SearchColumn::Nicename => &account.nicename,
        super::SearchColumn::DisplayName => &account.display_name,
        super::SearchColumn::Email => &account.email,
      };
      contains_ci(value, &term)
    });
    if !hit {
      return false;
    }
  }
  if let Some(filter) = &query.meta {
    let Some(value) = account_meta(data, account.id, &filter.key) else {
      return false;
    };
    let hit = match filter.compare {
      MetaCompare::Equals => value == filter.value,
      MetaCompare::Like => contains_ci(value, &filter.value.to_lowercase()),
    };
    if !hit {
      return false;
    }
  }
  true
}

fn compare_accounts(a: &AccountRecord, b: &AccountRecord, query: &AccountQuery) -> Ordering {
  let ordering = match query.order_by {
    AccountOrderBy::DisplayName => a
      .display_name
      .to_lowercase()
      .cmp(&b.display_name.to_lowercase())
      .then(a.id.cmp(&b.id)),
    AccountOrderBy::Registered => a.registered.cmp(&b.registered).then(a.id.cmp(&b.id)),
    AccountOrderBy::Login => a.login.cmp(&b.login).then(a.id.cmp(&b.id)),
    AccountOrderBy::Id => a.id.cmp(&b.id),
    AccountOrderBy::Include => {
      let position = |id: AccountId| {
        query
          .include
          .as_ref()
          .and_then(|ids| ids.iter().position(|i| *i == id))
          .unwrap_or(usize::MAX)
      };
      return position(a.id).cmp(&position(b.id));
    }
  };
  match query.order {
    SortOrder::Asc => ordering,
    SortOrder::Desc => ordering.reverse(),
  }
}

fn page_of<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
  let iter = items.into_iter().skip(offset);
  match limit {
    Some(limit) => iter.take(limit).collect(),
    None => iter.collect(),
  }
}

fn is_listed_product(product: &ProductRecord, author: AccountId, statuses: &[ProductStatus]) -> bool {
  product.author == author && !product.is_variation() && (statuses.is_empty() || statuses.contains(&product.status))
}

fn price_of(product: &ProductRecord) -> f64 {
  product.price.trim().parse::<f64>().unwrap_or(0.0)
}

fn compare_products(a: &ProductRecord, b: &ProductRecord, order_by: ProductOrderBy) -> Ordering {
  let primary = match order_by {
    ProductOrderBy::Date | ProductOrderBy::Modified => a.created.cmp(&b.created),
    ProductOrderBy::Id => Ordering::Equal,
    ProductOrderBy::Title => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    ProductOrderBy::Slug => a.slug.cmp(&b.slug),
    ProductOrderBy::Price => price_of(a).total_cmp(&price_of(b)),
    ProductOrderBy::Popularity => a.total_sales.cmp(&b.total_sales),
    ProductOrderBy::Rating => a.average_rating.total_cmp(&b.average_rating),
    ProductOrderBy::MenuOrder => a.menu_order.cmp(&b.menu_order),
  };
  primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl MetaStore for InMemoryStore {
  async fn get(&self, scope: MetaScope, id: u64, key: &str) -> BridgeResult<Option<String>> {
    let data = self.data.read();
    Ok(meta_map(&data, scope).get(&id).and_then(|m| m.get(key)).cloned())
  }

  async fn get_many(&self, scope: MetaScope, id: u64, keys: &[&str]) -> BridgeResult<HashMap<String, String>> {
    let data = self.data.read();
    let Some(entity) = meta_map(&data, scope).get(&id) else {
      return Ok(HashMap::new());
    };
    Ok(
      keys
        .iter()
        .filter_map(|k| entity.get(*k).map(|v| ((*k).to_string(), v.clone())))
        .collect(),
    )
  }
}

#[async_trait]
impl AccountStore for InMemoryStore {
  async fn find(&self, id: AccountId) -> BridgeResult<Option<AccountRecord>> {
    Ok(self.data.read().accounts.iter().find(|a| a.id == id).cloned())
  }

  async fn query(&self, query: &AccountQuery) -> BridgeResult<AccountPage> {
    let data = self.data.read();
    let mut matched: Vec<AccountRecord> = data
      .accounts
      .iter()
      .filter(|a| account_matches(&data, a, query))
      .cloned()
      .collect();
    matched.sort_by(|a, b| compare_accounts(a, b, query));
    let total = matched.len() as u64;
    Ok(AccountPage {
      accounts: page_of(matched, query.offset(), query.limit),
      total,
    })
  }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
  async fn product(&self, id: ProductId) -> BridgeResult<Option<ProductRecord>> {
    Ok(self.data.read().products.iter().find(|p| p.id == id).cloned())
  }

  async fn product_ids(&self, query: &ProductQuery) -> BridgeResult<Vec<ProductId>> {
    let data = self.data.read();
    let mut matched: Vec<&ProductRecord> = data
      .products
      .iter()
      .filter(|p| is_listed_product(p, query.author, &query.statuses))
      .collect();
    matched.sort_by(|a, b| {
      let ordering = compare_products(a, b, query.order_by);
      match query.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
      }
    });
    let ids = matched.into_iter().map(|p| p.id).collect();
    Ok(page_of(ids, query.offset(), query.limit))
  }

  async fn count_products(&self, author: AccountId, statuses: &[ProductStatus]) -> BridgeResult<u64> {
    let data = self.data.read();
    Ok(data.products.iter().filter(|p| is_listed_product(p, author, statuses)).count() as u64)
  }

  async fn author_product_counts(&self, status: ProductStatus) -> BridgeResult<Vec<(AccountId, u64)>> {
    let data = self.data.read();
    let mut counts: HashMap<AccountId, u64> = HashMap::new();
    for product in data.products.iter().filter(|p| p.status == status && !p.is_variation()) {
      *counts.entry(product.author).or_default() += 1;
    }
    Ok(counts.into_iter().collect())
  }

  async fn attachment_url(&self, attachment_id: u64) -> BridgeResult<Option<String>> {
    Ok(self.data.read().attachments.get(&attachment_id).cloned())
  }

  async fn comments(&self, query: &CommentQuery) -> BridgeResult<Vec<CommentRecord>> {
    let data = self.data.read();
    let mut matched = vendor_comments(&data, query);
    matched.sort_by(|a, b| b.date_gmt.cmp(&a.date_gmt).then(b.id.cmp(&a.id)));
    Ok(page_of(matched, query.offset(), query.limit))
  }

  async fn count_comments(&self, query: &CommentQuery) -> BridgeResult<u64> {
    let data = self.data.read();
    Ok(vendor_comments(&data, query).len() as u64)
  }
}

fn vendor_comments(data: &StoreSnapshot, query: &CommentQuery) -> Vec<CommentRecord> {
  let statuses = [query.post_status];
  data
    .comments
    .iter()
    .filter(|c| c.approved)
    .filter(|c| {
      data
        .products
        .iter()
        .any(|p| p.id == c.post_id && is_listed_product(p, query.post_author, &statuses))
    })
    .cloned()
    .collect()
}

#[async_trait]
impl CouponStore for InMemoryStore {
  async fn coupons_by_author(&self, author: AccountId) -> BridgeResult<Vec<CouponRecord>> {
    let data = self.data.read();
    let mut coupons: Vec<CouponRecord> = data.coupons.iter().filter(|c| c.author == author).cloned().collect();
    coupons.sort_by(|a, b| b.id.cmp(&a.id));
    Ok(coupons)
  }
}
