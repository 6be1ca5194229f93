// core/src/store/record.rs

//! Raw rows as the backing stores hand them over. Nothing here is serialized to API clients
//! directly; the projections in `vendor` and `catalog` do that.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AccountId = u64;
pub type ProductId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
  pub id: AccountId,
  #[serde(default)]
  pub login: String,
  #[serde(default)]
  pub nicename: String,
  #[serde(default)]
  pub display_name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default = "epoch")]
  pub registered: DateTime<Utc>,
  #[serde(default)]
  pub roles: Vec<String>,
}

fn epoch() -> DateTime<Utc> {
  DateTime::<Utc>::UNIX_EPOCH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
  Publish,
  Draft,
  Pending,
  Private,
  Future,
}

impl ProductStatus {
  pub const ALL: [ProductStatus; 5] = [
    ProductStatus::Publish,
    ProductStatus::Draft,
    ProductStatus::Pending,
    ProductStatus::Private,
    ProductStatus::Future,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ProductStatus::Publish => "publish",
      ProductStatus::Draft => "draft",
      ProductStatus::Pending => "pending",
      ProductStatus::Private => "private",
      ProductStatus::Future => "future",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    let needle = raw.trim().to_ascii_lowercase();
    Self::ALL.into_iter().find(|s| s.as_str() == needle)
  }
}

/// Product row. Prices stay strings end to end so no rounding ever touches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
  pub id: ProductId,
  /// Zero when the product is not a variation.
  #[serde(default)]
  pub parent_id: ProductId,
  pub author: AccountId,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub slug: String,
  #[serde(default = "simple_type")]
  pub product_type: String,
  #[serde(default = "publish")]
  pub status: ProductStatus,
  #[serde(default)]
  pub price: String,
  #[serde(default)]
  pub regular_price: String,
  #[serde(default)]
  pub sale_price: String,
  #[serde(default = "in_stock")]
  pub stock_status: String,
  #[serde(default)]
  pub average_rating: f64,
  #[serde(default)]
  pub rating_count: u64,
  #[serde(default)]
  pub image_id: u64,
  #[serde(default)]
  pub gallery_ids: Vec<u64>,
  #[serde(default = "epoch")]
  pub created: DateTime<Utc>,
  #[serde(default)]
  pub total_sales: u64,
  #[serde(default)]
  pub menu_order: i64,
}

fn simple_type() -> String {
  "simple".to_string()
}

fn publish() -> ProductStatus {
  ProductStatus::Publish
}

fn in_stock() -> String {
  "instock".to_string()
}

impl ProductRecord {
  pub fn is_variation(&self) -> bool {
    self.product_type == "variation"
  }

  /// A product is on sale when it carries a sale price below its regular price.
  pub fn is_on_sale(&self) -> bool {
    let sale = self.sale_price.trim();
    if sale.is_empty() {
      return false;
    }
    match (sale.parse::<f64>(), self.regular_price.trim().parse::<f64>()) {
      (Ok(sale), Ok(regular)) => sale < regular,
      (Ok(_), Err(_)) => true,
      _ => false,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
  pub id: u64,
  pub post_id: ProductId,
  #[serde(default)]
  pub author_name: String,
  #[serde(default)]
  pub content: String,
  /// Stored UTC timestamp, no offset attached.
  pub date_gmt: NaiveDateTime,
  #[serde(default = "approved")]
  pub approved: bool,
}

fn approved() -> bool {
  true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponRecord {
  pub id: u64,
  pub author: AccountId,
  pub code: String,
}
