// core/src/catalog/coupons.rs

use super::utc_iso8601;
use crate::error::BridgeResult;
use crate::store::{AccountId, Backends, MetaScope};
use chrono::DateTime;
use serde::Serialize;
use tracing::{info, instrument};

const DISCOUNT_TYPE: &str = "discount_type";
const AMOUNT: &str = "coupon_amount";
const USAGE_COUNT: &str = "usage_count";
const EXPIRES: &str = "date_expires";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coupon {
  pub id: u64,
  pub code: String,
  pub discount_type: String,
  /// Kept verbatim: may be a percentage or a fixed amount depending on `discount_type`.
  pub amount: String,
  pub usage_count: u64,
  pub date_expires: Option<String>,
}

fn expiry_from_timestamp(raw: Option<&String>) -> Option<String> {
  let seconds = raw?.trim().parse::<i64>().ok().filter(|s| *s > 0)?;
  DateTime::from_timestamp(seconds, 0).map(utc_iso8601)
}

/// Every coupon the vendor authored, whatever its status.
#[instrument(name = "catalog::vendor_coupons", skip(backends))]
pub async fn list_vendor_coupons(backends: &Backends, vendor_id: AccountId) -> BridgeResult<Vec<Coupon>> {
  let records = backends.coupons.coupons_by_author(vendor_id).await?;
  let mut coupons = Vec::with_capacity(records.len());
  for record in records {
    let meta = backends
      .meta
      .get_many(MetaScope::Post, record.id, &[DISCOUNT_TYPE, AMOUNT, USAGE_COUNT, EXPIRES])
      .await?;
    coupons.push(Coupon {
      id: record.id,
      code: record.code,
      discount_type: meta.get(DISCOUNT_TYPE).cloned().unwrap_or_default(),
      amount: meta.get(AMOUNT).cloned().unwrap_or_default(),
      usage_count: meta
        .get(USAGE_COUNT)
        .and_then(|u| u.trim().parse().ok())
        .unwrap_or(0),
      date_expires: expiry_from_timestamp(meta.get(EXPIRES)),
    });
  }
  info!(count = coupons.len(), "Vendor coupons listed.");
  Ok(coupons)
}
