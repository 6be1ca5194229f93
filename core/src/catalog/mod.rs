// core/src/catalog/mod.rs

//! Pass-through listings of what a vendor sells: products, the reviews left on them, and the
//! vendor's coupons. Each is a thin projection of raw store rows into client-ready records.

pub mod coupons;
pub mod products;
pub mod reviews;

pub use coupons::{list_vendor_coupons, Coupon};
pub use products::{list_vendor_products, parse_statuses, project_product, ProductImage, ProductListQuery, ProductSummary};
pub use reviews::{list_vendor_reviews, render_paragraphs, Review};

/// Upper bound on `per_page` for product and review listings.
pub const MAX_LISTING_PER_PAGE: usize = 50;

/// RFC 3339 with an explicit `+00:00` offset, the format clients already parse.
pub(crate) fn utc_iso8601(at: chrono::DateTime<chrono::Utc>) -> String {
  at.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
}
