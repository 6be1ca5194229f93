// core/src/service.rs

//! `VendorService`: the single entry point the HTTP layer talks to.
//!
//! It owns the backing-store bundle, the bridge configuration and the process-wide rating cache,
//! and assembles discovery results, projections and pagination into response-ready values.

use crate::catalog::{self, Coupon, ProductListQuery, ProductSummary, Review};
use crate::config::BridgeConfig;
use crate::discovery::{self, RoleFilter, SearchQuery, SectionsQuery};
use crate::error::{BridgeError, BridgeResult};
use crate::pagination::{Page, PageRequest};
use crate::rating::RatingCache;
use crate::store::{AccountId, AccountRecord, Backends, ProductId};
use crate::vendor::{VendorProjector, VendorRecord};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// The three discovery lists, projected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorSections {
  pub featured: Vec<VendorRecord>,
  pub new: Vec<VendorRecord>,
  pub top_rated: Vec<VendorRecord>,
}

pub struct VendorService {
  backends: Backends,
  config: BridgeConfig,
  ratings: RatingCache,
}

impl VendorService {
  pub fn new(backends: Backends, config: BridgeConfig) -> Self {
    let ratings = RatingCache::new(config.rating_ttl);
    Self {
      backends,
      config,
      ratings,
    }
  }

  pub fn backends(&self) -> &Backends {
    &self.backends
  }

  pub fn config(&self) -> &BridgeConfig {
    &self.config
  }

  pub fn ratings(&self) -> &RatingCache {
    &self.ratings
  }

  fn projector(&self) -> VendorProjector<'_> {
    VendorProjector::new(&self.backends, &self.config)
  }

  async fn project_page(&self, mut page: Page<AccountRecord>) -> BridgeResult<Page<VendorRecord>> {
    let accounts = std::mem::take(&mut page.items);
    let records = self.projector().project_all(accounts).await?;
    Ok(page.with_items(records))
  }

  /// Role-filtered listing when roles are given, otherwise vendors inferred from product
  /// authorship (most published products first, `products_count` = published count).
  #[instrument(name = "VendorService::list_vendors", skip(self))]
  pub async fn list_vendors(&self, roles: &RoleFilter, request: PageRequest) -> BridgeResult<Page<VendorRecord>> {
    if !roles.is_empty() {
      let found = discovery::discover_by_role(&self.backends, roles, request).await?;
      let page = self.project_page(found).await?;
      info!(total = page.total, returned = page.items.len(), path = "role", "Vendors listed.");
      return Ok(page);
    }

    let found = discovery::discover_by_authorship(&self.backends, request).await?;
    let mut page = self.project_page(found.accounts).await?;
    for record in &mut page.items {
      if let Some(count) = found.published_counts.get(&record.id) {
        record.products_count = *count;
      }
    }
    info!(total = page.total, returned = page.items.len(), path = "authorship", "Vendors listed.");
    Ok(page)
  }

  #[instrument(name = "VendorService::vendor", skip(self))]
  pub async fn vendor(&self, vendor_id: AccountId) -> BridgeResult<VendorRecord> {
    let Some(account) = self.backends.accounts.find(vendor_id).await? else {
      warn!("Vendor not found.");
      return Err(BridgeError::not_found("Vendor not found"));
    };
    self
      .projector()
      .project(account)
      .await?
      .ok_or_else(|| BridgeError::not_found("Vendor not found"))
  }

  /// The vendor who authored a product. Variation ids resolve through their parent product.
  #[instrument(name = "VendorService::vendor_by_product", skip(self))]
  pub async fn vendor_by_product(&self, product_id: ProductId) -> BridgeResult<VendorRecord> {
    let catalog = self.backends.catalog()?;

    let mut product = catalog.product(product_id).await?;
    let parent_id = product
      .as_ref()
      .filter(|p| p.is_variation() && p.parent_id > 0)
      .map(|p| p.parent_id);
    if let Some(parent_id) = parent_id {
      product = catalog.product(parent_id).await?;
    }
    let Some(product) = product else {
      warn!("Product not found.");
      return Err(BridgeError::not_found("Product not found"));
    };

    let vendor_id = product.author;
    let Some(account) = self.backends.accounts.find(vendor_id).await? else {
      warn!(vendor_id, "Product author has no account.");
      return Err(BridgeError::not_found("Vendor not found"));
    };
    let projector = self.projector();
    let mut record = projector
      .project(account)
      .await?
      .ok_or_else(|| BridgeError::not_found("Vendor not found"))?;
    record.links = Some(projector.links_for(vendor_id));
    Ok(record)
  }

  pub async fn vendor_products(&self, query: &ProductListQuery) -> BridgeResult<Page<ProductSummary>> {
    catalog::list_vendor_products(self.backends.catalog()?, query).await
  }

  pub async fn vendor_reviews(&self, vendor_id: AccountId, request: PageRequest) -> BridgeResult<Page<Review>> {
    catalog::list_vendor_reviews(&self.backends, vendor_id, request).await
  }

  pub async fn vendor_coupons(&self, vendor_id: AccountId) -> BridgeResult<Vec<Coupon>> {
    catalog::list_vendor_coupons(&self.backends, vendor_id).await
  }

  #[instrument(name = "VendorService::search_vendors", skip(self, query), fields(term = %query.term()))]
  pub async fn search_vendors(&self, query: &SearchQuery) -> BridgeResult<Page<VendorRecord>> {
    let page = discovery::discover_by_search(&self.backends, query).await?;
    self.project_page(page).await
  }

  #[instrument(name = "VendorService::vendor_sections", skip(self))]
  pub async fn vendor_sections(&self, query: SectionsQuery) -> BridgeResult<VendorSections> {
    let sections = discovery::discover_sections(&self.backends, &self.ratings, query).await?;
    let projector = self.projector();

    let featured = projector.project_all(sections.featured).await?;
    let new = projector.project_all(sections.new).await?;
    let mut top_rated = Vec::with_capacity(sections.top_rated.len());
    for rated in sections.top_rated {
      if let Some(mut record) = projector.project(rated.account).await? {
        record.avg_rating = Some(rated.rating);
        top_rated.push(record);
      }
    }
    Ok(VendorSections {
      featured,
      new,
      top_rated,
    })
  }

  pub async fn vendor_rating(&self, vendor_id: AccountId) -> BridgeResult<f64> {
    self.ratings.get_rating(self.backends.catalog()?, vendor_id).await
  }
}
