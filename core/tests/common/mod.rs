// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;
use vendor_bridge::store::{
  AccountId, AccountRecord, CatalogStore, CommentQuery, CommentRecord, CouponRecord, ProductId, ProductQuery,
  ProductRecord, ProductStatus,
};
use vendor_bridge::{Backends, BridgeConfig, BridgeResult, InMemoryStore, MetaScope, VendorService};

// --- Record builders ---

pub fn registered(day: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

pub fn account(id: AccountId, display_name: &str) -> AccountRecord {
  AccountRecord {
    id,
    login: display_name.to_lowercase().replace(' ', "_"),
    nicename: display_name.to_lowercase().replace(' ', "-"),
    display_name: display_name.to_string(),
    email: format!("{}@example.com", display_name.to_lowercase().replace(' ', ".")),
    registered: registered(1),
    roles: vec!["customer".to_string()],
  }
}

pub fn vendor_account(id: AccountId, display_name: &str) -> AccountRecord {
  AccountRecord {
    roles: vec!["marketking_vendor".to_string()],
    ..account(id, display_name)
  }
}

pub fn product(id: ProductId, author: AccountId, status: ProductStatus) -> ProductRecord {
  ProductRecord {
    id,
    parent_id: 0,
    author,
    name: format!("Product {}", id),
    slug: format!("product-{}", id),
    product_type: "simple".to_string(),
    status,
    price: "10.00".to_string(),
    regular_price: "10.00".to_string(),
    sale_price: String::new(),
    stock_status: "instock".to_string(),
    average_rating: 0.0,
    rating_count: 0,
    image_id: 0,
    gallery_ids: Vec::new(),
    created: registered(1),
    total_sales: 0,
    menu_order: 0,
  }
}

pub fn published(id: ProductId, author: AccountId) -> ProductRecord {
  product(id, author, ProductStatus::Publish)
}

pub fn rated(id: ProductId, author: AccountId, rating: f64) -> ProductRecord {
  ProductRecord {
    average_rating: rating,
    rating_count: if rating > 0.0 { 1 } else { 0 },
    ..published(id, author)
  }
}

pub fn comment(id: u64, post_id: ProductId, content: &str, date_gmt: &str) -> CommentRecord {
  CommentRecord {
    id,
    post_id,
    author_name: format!("Reviewer {}", id),
    content: content.to_string(),
    date_gmt: NaiveDateTime::parse_from_str(date_gmt, "%Y-%m-%d %H:%M:%S").unwrap(),
    approved: true,
  }
}

pub fn coupon(id: u64, author: AccountId, code: &str) -> CouponRecord {
  CouponRecord {
    id,
    author,
    code: code.to_string(),
  }
}

/// Adds `count` published products for `author`, ids starting at `first_id`.
pub fn add_published(store: &InMemoryStore, author: AccountId, first_id: ProductId, count: u64) {
  for offset in 0..count {
    store.insert_product(published(first_id + offset, author));
  }
}

pub fn set_account_meta(store: &InMemoryStore, id: AccountId, key: &str, value: &str) {
  store.set_meta(MetaScope::Account, id, key, value);
}

// --- Backends / service helpers ---

pub fn test_config() -> BridgeConfig {
  BridgeConfig::default()
    .with_site_url("https://shop.example.com")
    .with_namespace("mk/v1")
}

pub fn backends_for(store: &Arc<InMemoryStore>) -> Backends {
  Backends::from_store(store.clone())
}

pub fn service_for(store: &Arc<InMemoryStore>) -> VendorService {
  VendorService::new(backends_for(store), test_config())
}

/// Backends reading the catalog through a [`CountingCatalog`] over the same store.
pub fn counting_backends(store: &Arc<InMemoryStore>) -> (Backends, Arc<CountingCatalog>) {
  let counting = Arc::new(CountingCatalog::new(store.clone()));
  let backends = Backends::new(
    store.clone(),
    store.clone(),
    Some(counting.clone() as Arc<dyn CatalogStore>),
    store.clone(),
  );
  (backends, counting)
}

// --- Call-counting catalog wrapper ---

/// Delegates to an in-memory store and counts how often the catalog is read.
pub struct CountingCatalog {
  inner: Arc<InMemoryStore>,
  pub product_id_queries: AtomicUsize,
  pub product_loads: AtomicUsize,
}

impl CountingCatalog {
  pub fn new(inner: Arc<InMemoryStore>) -> Self {
    Self {
      inner,
      product_id_queries: AtomicUsize::new(0),
      product_loads: AtomicUsize::new(0),
    }
  }

  pub fn reads(&self) -> usize {
    self.product_id_queries.load(Ordering::SeqCst) + self.product_loads.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CatalogStore for CountingCatalog {
  async fn product(&self, id: ProductId) -> BridgeResult<Option<ProductRecord>> {
    self.product_loads.fetch_add(1, Ordering::SeqCst);
    self.inner.product(id).await
  }

  async fn product_ids(&self, query: &ProductQuery) -> BridgeResult<Vec<ProductId>> {
    self.product_id_queries.fetch_add(1, Ordering::SeqCst);
    self.inner.product_ids(query).await
  }

  async fn count_products(&self, author: AccountId, statuses: &[ProductStatus]) -> BridgeResult<u64> {
    self.inner.count_products(author, statuses).await
  }

  async fn author_product_counts(&self, status: ProductStatus) -> BridgeResult<Vec<(AccountId, u64)>> {
    self.inner.author_product_counts(status).await
  }

  async fn attachment_url(&self, attachment_id: u64) -> BridgeResult<Option<String>> {
    self.inner.attachment_url(attachment_id).await
  }

  async fn comments(&self, query: &CommentQuery) -> BridgeResult<Vec<CommentRecord>> {
    self.inner.comments(query).await
  }

  async fn count_comments(&self, query: &CommentQuery) -> BridgeResult<u64> {
    self.inner.count_comments(query).await
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
