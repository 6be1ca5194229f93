// server/src/web/handlers/vendor_handlers.rs

use actix_web::{http::header, web, HttpResponse};
use serde::Serialize;
use tracing::{info, instrument};
use vendor_bridge::discovery::{RoleFilter, SearchQuery, SectionsQuery};
use vendor_bridge::discovery::sections::DEFAULT_SECTION_LIMIT;
use vendor_bridge::{Page, VendorRecord};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::params::{paged_ok, QueryParams};

/// Body of the paged vendor listings.
#[derive(Serialize, Debug)]
pub struct VendorListBody<'a> {
  pub page: usize,
  pub per_page: usize,
  pub total: u64,
  pub total_pages: u64,
  pub vendors: &'a [VendorRecord],
}

impl<'a> From<&'a Page<VendorRecord>> for VendorListBody<'a> {
  fn from(page: &'a Page<VendorRecord>) -> Self {
    Self {
      page: page.page,
      per_page: page.per_page,
      total: page.total,
      total_pages: page.total_pages,
      vendors: &page.items,
    }
  }
}

fn vendor_list_response(page: &Page<VendorRecord>) -> HttpResponse {
  paged_ok(page).json(VendorListBody::from(page))
}

#[instrument(name = "handler::list_vendors", skip(app_state, query))]
pub async fn list_vendors_handler(
  app_state: web::Data<AppState>,
  query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
  let params = QueryParams::new(query.into_inner());
  let roles = RoleFilter::new(params.all(&["role", "role[]"]));
  let request = params.page_request();

  let page = app_state.vendors.list_vendors(&roles, request).await?;
  info!(total = page.total, returned = page.items.len(), "Vendor listing served.");
  Ok(vendor_list_response(&page))
}

#[instrument(name = "handler::get_vendor", skip(app_state, path), fields(vendor_id = *path.as_ref()))]
pub async fn get_vendor_handler(
  app_state: web::Data<AppState>,
  path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
  let vendor_id = path.into_inner();
  let vendor = app_state.vendors.vendor(vendor_id).await?;
  Ok(HttpResponse::Ok().json(vendor))
}

#[instrument(name = "handler::vendor_by_product", skip(app_state, path), fields(product_id = *path.as_ref()))]
pub async fn vendor_by_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let vendor = app_state.vendors.vendor_by_product(product_id).await?;
  info!(vendor_id = vendor.id, "Product vendor resolved.");
  Ok(
    HttpResponse::Ok()
      .insert_header((header::CACHE_CONTROL, "public, max-age=60"))
      .json(vendor),
  )
}

#[instrument(name = "handler::search_vendors", skip(app_state, query))]
pub async fn search_vendors_handler(
  app_state: web::Data<AppState>,
  query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
  let params = QueryParams::new(query.into_inner());
  let search = SearchQuery::new(
    params.get("q"),
    params.page_request(),
    params.flag_or("with_products_only", true),
  )?;

  let page = app_state.vendors.search_vendors(&search).await?;
  info!(term = %search.term(), total = page.total, "Vendor search served.");
  Ok(vendor_list_response(&page))
}

#[instrument(name = "handler::vendor_sections", skip(app_state, query))]
pub async fn vendor_sections_handler(
  app_state: web::Data<AppState>,
  query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
  let params = QueryParams::new(query.into_inner());
  let sections_query = SectionsQuery::new(
    params.int_or("limit", DEFAULT_SECTION_LIMIT as i64),
    params.flag_or("with_products_only", true),
  );

  let sections = app_state.vendors.vendor_sections(sections_query).await?;
  info!(
    featured = sections.featured.len(),
    new = sections.new.len(),
    top_rated = sections.top_rated.len(),
    "Vendor sections served."
  );
  Ok(HttpResponse::Ok().json(sections))
}
