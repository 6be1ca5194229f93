// core/src/catalog/products.rs

use super::MAX_LISTING_PER_PAGE;
use crate::error::BridgeResult;
use crate::pagination::{Page, PageRequest};
use crate::store::{AccountId, CatalogStore, ProductId, ProductOrderBy, ProductQuery, ProductStatus, SortOrder};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductImage {
  pub id: u64,
  pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
  pub id: ProductId,
  pub name: String,
  pub slug: String,
  #[serde(rename = "type")]
  pub product_type: String,
  pub price: String,
  pub regular_price: String,
  pub sale_price: String,
  pub on_sale: bool,
  pub stock_status: String,
  pub average_rating: f64,
  pub rating_count: u64,
  pub images: Vec<ProductImage>,
}

/// Comma-separated statuses; unknown entries are dropped and an empty result means `publish`.
pub fn parse_statuses(raw: Option<&str>) -> Vec<ProductStatus> {
  let mut statuses = Vec::new();
  for status in raw.unwrap_or_default().split(',').filter_map(ProductStatus::parse) {
    if !statuses.contains(&status) {
      statuses.push(status);
    }
  }
  if statuses.is_empty() {
    statuses.push(ProductStatus::Publish);
  }
  statuses
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductListQuery {
  pub vendor_id: AccountId,
  pub request: PageRequest,
  pub order_by: ProductOrderBy,
  pub order: SortOrder,
  pub statuses: Vec<ProductStatus>,
}

impl ProductListQuery {
  /// Builds a listing query from raw client parameters; bad values fall back to defaults.
  pub fn from_params(
    vendor_id: AccountId,
    request: PageRequest,
    orderby: Option<&str>,
    order: Option<&str>,
    status: Option<&str>,
  ) -> Self {
    Self {
      vendor_id,
      request: request.capped(MAX_LISTING_PER_PAGE),
      order_by: ProductOrderBy::parse(orderby),
      order: SortOrder::parse_or(order, SortOrder::Desc),
      statuses: parse_statuses(status),
    }
  }
}

/// `None` when the product id does not resolve.
pub async fn project_product(catalog: &dyn CatalogStore, id: ProductId) -> BridgeResult<Option<ProductSummary>> {
  let Some(product) = catalog.product(id).await? else {
    return Ok(None);
  };

  let mut seen = HashSet::new();
  let mut images = Vec::new();
  let image_ids = std::iter::once(product.image_id).chain(product.gallery_ids.iter().copied());
  for image_id in image_ids.filter(|id| *id > 0 && seen.insert(*id)) {
    if let Some(src) = catalog.attachment_url(image_id).await?.filter(|u| !u.is_empty()) {
      images.push(ProductImage { id: image_id, src });
    }
  }

  Ok(Some(ProductSummary {
    on_sale: product.is_on_sale(),
    id: product.id,
    name: product.name,
    slug: product.slug,
    product_type: product.product_type,
    price: product.price,
    regular_price: product.regular_price,
    sale_price: product.sale_price,
    stock_status: product.stock_status,
    average_rating: product.average_rating,
    rating_count: product.rating_count,
    images,
  }))
}

#[instrument(name = "catalog::vendor_products", skip(catalog), fields(vendor_id = query.vendor_id))]
pub async fn list_vendor_products(
  catalog: &dyn CatalogStore,
  query: &ProductListQuery,
) -> BridgeResult<Page<ProductSummary>> {
  let ids = catalog
    .product_ids(
      &ProductQuery::by_author(query.vendor_id)
        .with_statuses(query.statuses.clone())
        .ordered_by(query.order_by, query.order)
        .limited(query.request.per_page, query.request.page),
    )
    .await?;
  let total = catalog.count_products(query.vendor_id, &query.statuses).await?;

  let mut products = Vec::with_capacity(ids.len());
  for id in ids {
    if let Some(product) = project_product(catalog, id).await? {
      products.push(product);
    }
  }
  info!(total, returned = products.len(), "Vendor products listed.");
  Ok(Page::from_slice(products, total, query.request))
}
