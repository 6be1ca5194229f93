// server/tests/api_tests.rs

use actix_web::{
  http::{header, StatusCode},
  test, web, App,
};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::PathBuf;
use vendor_api::config::AppConfig;
use vendor_api::state::AppState;
use vendor_api::web::configure_app_routes;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

const BASE: &str = "/wp-json/mk/v1";

fn seed_path() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seed/marketplace.json")
}

fn memory_config() -> AppConfig {
  let mut config = AppConfig::for_memory("https://shop.example.com");
  config.seed_file = Some(seed_path());
  config
}

async fn state_with(config: AppConfig) -> AppState {
  Lazy::force(&TRACING_INIT);
  vendor_api::build_state(config).await.unwrap()
}

// Builds the app exactly as main.rs does, minus the request logger.
macro_rules! init_app {
  ($state:expr) => {{
    let state: AppState = $state;
    let namespace = state.config.api_namespace.clone();
    test::init_service(
      App::new()
        .app_data(web::Data::new(state))
        .configure(|cfg| configure_app_routes(cfg, &namespace)),
    )
    .await
  }};
}

// GET `BASE + path`, returning status, headers and the JSON body.
macro_rules! get {
  ($app:expr, $path:expr) => {{
    let request = test::TestRequest::get().uri(&format!("{}{}", BASE, $path)).to_request();
    let response = test::call_service(&$app, request).await;
    let status: StatusCode = response.status();
    let headers: header::HeaderMap = response.headers().clone();
    let body: Value = test::read_body_json(response).await;
    (status, headers, body)
  }};
}

fn header_str<'a>(headers: &'a header::HeaderMap, name: &str) -> &'a str {
  headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or_default()
}

fn ids(items: &Value) -> Vec<u64> {
  items
    .as_array()
    .unwrap()
    .iter()
    .map(|item| item["id"].as_u64().unwrap())
    .collect()
}

#[actix_web::test]
async fn ping_reports_ok_and_utc_time() {
  let app = init_app!(state_with(memory_config()).await);
  let (status, _, body) = get!(app, "/ping");

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], true);
  let time = body["time"].as_str().unwrap();
  assert!(chrono::NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S").is_ok());
}

#[actix_web::test]
async fn vendors_without_role_rank_by_published_products() {
  let app = init_app!(state_with(memory_config()).await);
  let (status, headers, body) = get!(app, "/vendors");

  assert_eq!(status, StatusCode::OK);
  assert_eq!(ids(&body["vendors"]), vec![1, 2]);
  assert_eq!(body["vendors"][0]["products_count"], 3);
  assert_eq!(body["vendors"][1]["products_count"], 2);
  assert_eq!(body["page"], 1);
  assert_eq!(body["per_page"], 20);
  assert_eq!(body["total"], 2);
  assert_eq!(header_str(&headers, "X-WP-Total"), "2");
  assert_eq!(header_str(&headers, "X-WP-TotalPages"), "1");
}

#[actix_web::test]
async fn vendors_by_role_accept_scalar_and_list_forms() {
  let app = init_app!(state_with(memory_config()).await);

  let (_, headers, body) = get!(app, "/vendors?role=marketking_vendor&per_page=2");
  assert_eq!(ids(&body["vendors"]), vec![1, 2]);
  assert_eq!(body["total"], 3);
  // The role path counts products in every status.
  assert_eq!(body["vendors"][0]["products_count"], 4);
  assert_eq!(header_str(&headers, "X-WP-Total"), "3");
  assert_eq!(header_str(&headers, "X-WP-TotalPages"), "2");

  let (_, _, body) = get!(app, "/vendors?role%5B%5D=customer&role%5B%5D=marketking_vendor&page=2&per_page=3");
  assert_eq!(ids(&body["vendors"]), vec![4]);
  assert_eq!(body["total"], 4);
}

#[actix_web::test]
async fn huge_pages_are_empty_on_every_listing() {
  let app = init_app!(state_with(memory_config()).await);
  let huge = "page=9223372036854775807";

  let (status, headers, body) = get!(app, &format!("/vendors?{}", huge));
  assert_eq!(status, StatusCode::OK);
  assert!(body["vendors"].as_array().unwrap().is_empty());
  assert_eq!(body["total"], 2);
  assert_eq!(header_str(&headers, "X-WP-Total"), "2");

  let (status, _, body) = get!(app, "/vendors?role=marketking_vendor&per_page=4&page=4611686018427387905");
  assert_eq!(status, StatusCode::OK);
  assert!(body["vendors"].as_array().unwrap().is_empty());
  assert_eq!(body["total"], 3);

  let (status, _, body) = get!(app, &format!("/vendors/search?q=example.com&with_products_only=0&{}", huge));
  assert_eq!(status, StatusCode::OK);
  assert!(body["vendors"].as_array().unwrap().is_empty());

  for listing in ["products", "reviews"] {
    let (status, headers, body) = get!(app, &format!("/vendors/1/{}?{}", listing, huge));
    assert_eq!(status, StatusCode::OK, "{}", listing);
    assert!(body.as_array().unwrap().is_empty(), "{}", listing);
    assert_ne!(header_str(&headers, "X-WP-Total"), "0", "{}", listing);
  }
}

#[actix_web::test]
async fn vendor_detail_projects_metadata() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, _, body) = get!(app, "/vendors/1");
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["store_name"], "Alice's Apiary");
  assert_eq!(body["phone"], "555-0101");
  assert_eq!(body["social"]["twitter"], "https://twitter.com/alicesapiary");
  assert!(body["logo"].as_str().unwrap().starts_with("https://secure.gravatar.com/avatar/"));
  assert!(body.get("links").is_none());

  let (_, _, body) = get!(app, "/vendors/2");
  assert_eq!(body["store_name"], "Bruno's Bakes");
  assert_eq!(body["logo"], "https://cdn.example.com/uploads/bruno-logo.png");

  let (_, _, body) = get!(app, "/vendors/3");
  assert_eq!(body["store_name"], "Carla");
  assert_eq!(body["products_count"], 0);
}

#[actix_web::test]
async fn unknown_vendor_is_404_not_found() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, _, body) = get!(app, "/vendors/999999");
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], "NOT_FOUND");
  assert_eq!(body["message"], "Vendor not found");
  assert_eq!(body["data"]["status"], 404);

  let (status, _, body) = get!(app, "/vendors/not-a-number");
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn by_product_resolves_variations_and_adds_links() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, headers, body) = get!(app, "/vendors/by-product/103");
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["id"], 1);
  assert_eq!(header_str(&headers, "cache-control"), "public, max-age=60");
  assert_eq!(body["links"]["author_archive"], "https://shop.example.com/?author=1");
  assert_eq!(body["links"]["api_self"], "https://shop.example.com/wp-json/mk/v1/vendors/1");
  assert_eq!(
    body["links"]["api_products"],
    "https://shop.example.com/wp-json/mk/v1/vendors/1/products"
  );

  let (_, _, body) = get!(app, "/vendors/by-product/201");
  assert_eq!(body["id"], 2);

  let (status, _, body) = get!(app, "/vendors/by-product/5555");
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["message"], "Product not found");
}

#[actix_web::test]
async fn vendor_products_list_with_totals() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, headers, body) = get!(app, "/vendors/1/products");
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ids(&body), vec![101, 100, 104]);
  assert_eq!(header_str(&headers, "X-WP-Total"), "3");
  assert_eq!(header_str(&headers, "X-WP-TotalPages"), "1");

  let wildflower = &body[1];
  assert_eq!(wildflower["type"], "variable");
  assert_eq!(ids(&wildflower["images"]), vec![500, 501]);
  assert_eq!(wildflower["images"][0]["src"], "https://cdn.example.com/uploads/wildflower.jpg");
  assert_eq!(body[0]["on_sale"], true);

  let (_, headers, body) = get!(app, "/vendors/1/products?orderby=title&order=asc&per_page=2");
  assert_eq!(ids(&body), vec![104, 101]);
  assert_eq!(header_str(&headers, "X-WP-TotalPages"), "2");

  let (_, headers, _) = get!(app, "/vendors/1/products?status=publish,draft,bogus&orderby=nonsense&order=up");
  assert_eq!(header_str(&headers, "X-WP-Total"), "4");
}

#[actix_web::test]
async fn vendor_reviews_render_paragraphs() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, headers, body) = get!(app, "/vendors/1/reviews");
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ids(&body), vec![900, 901]);
  assert_eq!(header_str(&headers, "X-WP-Total"), "2");
  assert_eq!(body[0]["rating"], 5.0);
  assert_eq!(body[0]["content"], "<p>Sweet and floral.</p>\n<p>Will reorder.</p>\n");
  assert_eq!(body[0]["date"], "2024-04-02T10:00:00+00:00");
  assert_eq!(body[0]["product_id"], 100);

  let (_, headers, body) = get!(app, "/vendors/1/reviews?per_page=1&page=2");
  assert_eq!(ids(&body), vec![901]);
  assert_eq!(header_str(&headers, "X-WP-TotalPages"), "2");
}

#[actix_web::test]
async fn vendor_coupons_expose_settings() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, _, body) = get!(app, "/vendors/1/coupons");
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["code"], "HONEY10");
  assert_eq!(body[0]["discount_type"], "percent");
  assert_eq!(body[0]["amount"], "10");
  assert_eq!(body[0]["usage_count"], 2);
  assert_eq!(body[0]["date_expires"], "2026-01-01T00:00:00+00:00");

  let (_, _, body) = get!(app, "/vendors/2/coupons");
  assert_eq!(body[0]["date_expires"], Value::Null);

  let (status, _, body) = get!(app, "/vendors/424242/coupons");
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, serde_json::json!([]));
}

#[actix_web::test]
async fn search_unites_fields_and_store_names() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, headers, body) = get!(app, "/vendors/search?q=apiary");
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ids(&body["vendors"]), vec![1]);
  assert_eq!(body["total"], 1);
  assert_eq!(header_str(&headers, "X-WP-Total"), "1");

  // Every account matches on email; only vendors with published products remain by default.
  let (_, _, body) = get!(app, "/vendors/search?q=example.com");
  assert_eq!(ids(&body["vendors"]), vec![1, 2]);

  let (_, _, body) = get!(app, "/vendors/search?q=example.com&with_products_only=0");
  assert_eq!(ids(&body["vendors"]), vec![1, 2, 3, 4]);
}

#[actix_web::test]
async fn search_without_term_is_a_validation_error() {
  let app = init_app!(state_with(memory_config()).await);

  for path in ["/vendors/search", "/vendors/search?q=%20%20"] {
    let (status, _, body) = get!(app, path);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
    assert_eq!(body["data"]["status"], 400);
  }
}

#[actix_web::test]
async fn sections_are_bounded_and_rated() {
  let app = init_app!(state_with(memory_config()).await);

  let (status, _, body) = get!(app, "/vendors/sections?limit=5");
  assert_eq!(status, StatusCode::OK);
  for section in ["featured", "new", "top_rated"] {
    assert!(body[section].as_array().unwrap().len() <= 5);
  }

  let (_, _, body) = get!(app, "/vendors/sections?limit=1");
  assert_eq!(ids(&body["featured"]), vec![1]);
  assert_eq!(ids(&body["new"]), vec![2]);
  assert_eq!(ids(&body["top_rated"]), vec![1]);
  let rating = body["top_rated"][0]["_avg_rating"].as_f64().unwrap();
  assert!((rating - 4.3).abs() < 1e-9);
  assert!(body["featured"][0].get("_avg_rating").is_none());
}

#[actix_web::test]
async fn disabled_catalog_fails_with_dependency_missing() {
  let mut config = memory_config();
  config.catalog_enabled = false;
  let app = init_app!(state_with(config).await);

  for path in ["/vendors", "/vendors/1", "/vendors/by-product/100", "/vendors/1/products", "/vendors/sections"] {
    let (status, _, body) = get!(app, path);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
    assert_eq!(body["code"], "DEPENDENCY_MISSING", "{}", path);
  }

  let (status, _, _) = get!(app, "/ping");
  assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn custom_namespace_moves_every_route() {
  let mut config = memory_config();
  config.api_namespace = "market/v2".to_string();
  let app = init_app!(state_with(config).await);

  let request = test::TestRequest::get().uri("/wp-json/market/v2/vendors/2").to_request();
  let response = test::call_service(&app, request).await;
  assert_eq!(response.status(), StatusCode::OK);

  let request = test::TestRequest::get().uri("/wp-json/mk/v1/vendors/2").to_request();
  let response = test::call_service(&app, request).await;
  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
