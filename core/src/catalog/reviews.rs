// core/src/catalog/reviews.rs

use super::{utc_iso8601, MAX_LISTING_PER_PAGE};
use crate::error::BridgeResult;
use crate::pagination::{Page, PageRequest};
use crate::store::{AccountId, Backends, CommentQuery, CommentRecord, MetaScope, ProductId};
use serde::Serialize;
use tracing::{info, instrument};

const RATING_KEY: &str = "rating";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
  pub id: u64,
  pub author_name: String,
  pub content: String,
  pub rating: f64,
  pub date: String,
  pub product_id: ProductId,
}

/// Turns plain comment text into paragraphs: blank-line separated blocks become `<p>` elements
/// and single line breaks inside a block become `<br />`.
pub fn render_paragraphs(text: &str) -> String {
  let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
  let mut html = String::new();
  let mut block: Vec<&str> = Vec::new();

  for line in normalized.lines() {
    let line = line.trim();
    if line.is_empty() {
      flush_paragraph(&mut block, &mut html);
    } else {
      block.push(line);
    }
  }
  flush_paragraph(&mut block, &mut html);
  html
}

fn flush_paragraph(block: &mut Vec<&str>, html: &mut String) {
  if !block.is_empty() {
    html.push_str("<p>");
    html.push_str(&block.join("<br />\n"));
    html.push_str("</p>\n");
    block.clear();
  }
}

fn parse_rating(raw: Option<String>) -> f64 {
  raw
    .and_then(|r| r.trim().parse::<f64>().ok())
    .filter(|r| r.is_finite())
    .unwrap_or(0.0)
}

async fn project_review(backends: &Backends, comment: CommentRecord) -> BridgeResult<Review> {
  let rating = parse_rating(backends.meta.get(MetaScope::Comment, comment.id, RATING_KEY).await?);
  Ok(Review {
    id: comment.id,
    author_name: comment.author_name,
    content: render_paragraphs(&comment.content),
    rating,
    date: utc_iso8601(comment.date_gmt.and_utc()),
    product_id: comment.post_id,
  })
}

/// Approved reviews on the vendor's published products, newest first.
#[instrument(name = "catalog::vendor_reviews", skip(backends))]
pub async fn list_vendor_reviews(
  backends: &Backends,
  vendor_id: AccountId,
  request: PageRequest,
) -> BridgeResult<Page<Review>> {
  let catalog = backends.catalog()?;
  let request = request.capped(MAX_LISTING_PER_PAGE);
  let query = CommentQuery::for_vendor(vendor_id);

  let comments = catalog.comments(&query.clone().limited(request.per_page, request.page)).await?;
  let total = catalog.count_comments(&query).await?;

  let mut reviews = Vec::with_capacity(comments.len());
  for comment in comments {
    reviews.push(project_review(backends, comment).await?);
  }
  info!(total, returned = reviews.len(), "Vendor reviews listed.");
  Ok(Page::from_slice(reviews, total, request))
}
