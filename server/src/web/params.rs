// server/src/web/params.rs

//! Query-string handling shared by the handlers.
//!
//! Optional parameters are never rejected: integers are read leniently (leading digits, anything
//! else is 0) and then clamped by the core types, flags accept `1`/`true` only.

use actix_web::{HttpResponse, HttpResponseBuilder};
use vendor_bridge::{Page, PageRequest};

pub const DEFAULT_PER_PAGE: i64 = 20;

pub const TOTAL_HEADER: &str = "X-WP-Total";
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Raw `name=value` pairs in request order. Repeated names are kept.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
  pub fn new(pairs: Vec<(String, String)>) -> Self {
    Self(pairs)
  }

  /// Last value given for `name`.
  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
  }

  /// Every value under any of `names`, e.g. both `role` and `role[]`.
  pub fn all(&self, names: &[&str]) -> Vec<&str> {
    self
      .0
      .iter()
      .filter(|(k, _)| names.contains(&k.as_str()))
      .map(|(_, v)| v.as_str())
      .collect()
  }

  pub fn int_or(&self, name: &str, default: i64) -> i64 {
    self.get(name).map(lenient_int).unwrap_or(default)
  }

  pub fn flag_or(&self, name: &str, default: bool) -> bool {
    match self.get(name) {
      Some(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true"),
      None => default,
    }
  }

  pub fn page_request(&self) -> PageRequest {
    PageRequest::new(self.int_or("page", 1), self.int_or("per_page", DEFAULT_PER_PAGE))
  }
}

/// Leading optional sign and digits; no digits reads as 0. Saturates instead of overflowing.
pub fn lenient_int(raw: &str) -> i64 {
  let raw = raw.trim();
  let (negative, digits) = match raw.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, raw.strip_prefix('+').unwrap_or(raw)),
  };
  let mut value: i64 = 0;
  for digit in digits.chars().map_while(|c| c.to_digit(10)) {
    value = value.saturating_mul(10).saturating_add(i64::from(digit));
  }
  if negative {
    -value
  } else {
    value
  }
}

/// `200 OK` carrying the listing totals as headers; they always match the page's body fields.
pub fn paged_ok<T>(page: &Page<T>) -> HttpResponseBuilder {
  let mut builder = HttpResponse::Ok();
  builder
    .insert_header((TOTAL_HEADER, page.total.to_string()))
    .insert_header((TOTAL_PAGES_HEADER, page.total_pages.to_string()));
  builder
}
