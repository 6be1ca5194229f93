// core/src/pagination.rs

//! Page arithmetic shared by every list endpoint.
//!
//! `page` and `per_page` are clamped to at least 1, `total_pages` is never below 1 (even for an
//! empty listing) and a page past the end is an empty slice rather than an error.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: usize,
  pub per_page: usize,
}

impl PageRequest {
  /// Accepts raw client values; zero or negative numbers are clamped to 1.
  pub fn new(page: i64, per_page: i64) -> Self {
    Self {
      page: page.max(1) as usize,
      per_page: per_page.max(1) as usize,
    }
  }

  pub fn capped(self, max_per_page: usize) -> Self {
    Self {
      page: self.page,
      per_page: self.per_page.min(max_per_page.max(1)),
    }
  }

  /// Saturates instead of overflowing, so absurd pages land past the end.
  pub fn offset(&self) -> usize {
    (self.page.max(1) - 1).saturating_mul(self.per_page)
  }
}

pub fn total_pages(total: u64, per_page: usize) -> u64 {
  let per_page = per_page.max(1) as u64;
  total.div_ceil(per_page).max(1)
}

/// A slice of a larger listing together with the numbers clients need to page through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page: usize,
  pub per_page: usize,
  pub total: u64,
  pub total_pages: u64,
}

impl<T> Page<T> {
  /// Wraps items that were already paged by a backing store.
  pub fn from_slice(items: Vec<T>, total: u64, request: PageRequest) -> Self {
    Self {
      items,
      page: request.page,
      per_page: request.per_page,
      total,
      total_pages: total_pages(total, request.per_page),
    }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items: self.items.into_iter().map(f).collect(),
      page: self.page,
      per_page: self.per_page,
      total: self.total,
      total_pages: self.total_pages,
    }
  }

  pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
    Page {
      items,
      page: self.page,
      per_page: self.per_page,
      total: self.total,
      total_pages: self.total_pages,
    }
  }
}

/// Cuts the requested page out of a fully materialized sequence.
pub fn paginate<T: Clone>(sequence: &[T], total: u64, request: PageRequest) -> Page<T> {
  let items = sequence
    .iter()
    .skip(request.offset())
    .take(request.per_page)
    .cloned()
    .collect();
  Page::from_slice(items, total, request)
}
