// server/src/web/handlers/catalog_handlers.rs

//! Per-vendor product, review and coupon listings. None of these check that the vendor exists;
//! an unknown id simply yields an empty listing.

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};
use vendor_bridge::catalog::ProductListQuery;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::params::{paged_ok, QueryParams};

#[instrument(name = "handler::vendor_products", skip(app_state, path, query), fields(vendor_id = *path.as_ref()))]
pub async fn vendor_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<u64>,
  query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
  let vendor_id = path.into_inner();
  let params = QueryParams::new(query.into_inner());
  let listing = ProductListQuery::from_params(
    vendor_id,
    params.page_request(),
    params.get("orderby"),
    params.get("order"),
    params.get("status"),
  );

  let page = app_state.vendors.vendor_products(&listing).await?;
  Ok(paged_ok(&page).json(&page.items))
}

#[instrument(name = "handler::vendor_reviews", skip(app_state, path, query), fields(vendor_id = *path.as_ref()))]
pub async fn vendor_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<u64>,
  query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
  let vendor_id = path.into_inner();
  let params = QueryParams::new(query.into_inner());

  let page = app_state.vendors.vendor_reviews(vendor_id, params.page_request()).await?;
  Ok(paged_ok(&page).json(&page.items))
}

#[instrument(name = "handler::vendor_coupons", skip(app_state, path), fields(vendor_id = *path.as_ref()))]
pub async fn vendor_coupons_handler(
  app_state: web::Data<AppState>,
  path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
  let vendor_id = path.into_inner();
  let coupons = app_state.vendors.vendor_coupons(vendor_id).await?;
  info!(count = coupons.len(), "Vendor coupons served.");
  Ok(HttpResponse::Ok().json(coupons))
}
