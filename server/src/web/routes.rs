// server/src/web/routes.rs

use actix_web::{error::InternalError, web, HttpResponse, ResponseError};
use vendor_bridge::BridgeError;

use crate::errors::AppError;
use crate::web::handlers::{catalog_handlers, ping_handlers, vendor_handlers};

// Ids are digits only; anything else is an unknown resource, reported in the API's error shape.
fn path_config() -> web::PathConfig {
  web::PathConfig::default().error_handler(|err, _req| {
    let app_err = AppError::Bridge(BridgeError::not_found("No route was found matching the URL"));
    InternalError::from_response(err, app_err.error_response()).into()
  })
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, _req| {
    let app_err = AppError::Bridge(BridgeError::Validation(format!("Malformed query string: {}", err)));
    let response: HttpResponse = app_err.error_response();
    InternalError::from_response(err, response).into()
  })
}

/// Mounts every route under `/wp-json/{namespace}`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig, namespace: &str) {
  cfg.service(
    web::scope(&format!("/wp-json/{}", namespace.trim_matches('/')))
      .app_data(path_config())
      .app_data(query_config())
      .route("/ping", web::get().to(ping_handlers::ping_handler))
      .service(
        web::scope("/vendors")
          .route("", web::get().to(vendor_handlers::list_vendors_handler))
          // Literal segments first so they never reach the `{id}` routes.
          .route("/search", web::get().to(vendor_handlers::search_vendors_handler))
          .route("/sections", web::get().to(vendor_handlers::vendor_sections_handler))
          .route(
            "/by-product/{product_id}",
            web::get().to(vendor_handlers::vendor_by_product_handler),
          )
          .route("/{id}", web::get().to(vendor_handlers::get_vendor_handler))
          .route("/{id}/products", web::get().to(catalog_handlers::vendor_products_handler))
          .route("/{id}/reviews", web::get().to(catalog_handlers::vendor_reviews_handler))
          .route("/{id}/coupons", web::get().to(catalog_handlers::vendor_coupons_handler)),
      ),
  );
}
