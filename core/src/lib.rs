// src/lib.rs

//! vendor-bridge: a read-only aggregation layer over a vendor marketplace.
//!
//! Products in the catalog are owned by vendor accounts. This crate answers "who are the
//! vendors", "what does vendor X sell", "what reviews and coupons does vendor X have" and
//! "which vendors should a storefront surface", by joining accounts, metadata, products,
//! comments and coupons into denormalized records:
//!  - Vendor discovery by role, by product authorship, by free-text search, and as
//!    featured / new / top-rated sections.
//!  - A projection of accounts into vendor records (store name fallbacks, generated logos,
//!    social links, product counts).
//!  - A TTL cache of per-vendor average ratings.
//!  - Consistent pagination across every listing.
//!
//! Backing stores are reached through the traits in [`store`], bundled in [`store::Backends`]
//! and passed explicitly; there is no global state besides the rating cache owned by
//! [`VendorService`].

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pagination;
pub mod rating;
pub mod service;
pub mod store;
pub mod vendor;

// --- Re-exports for the Public API ---

pub use crate::config::BridgeConfig;
pub use crate::error::{BridgeError, BridgeResult};
pub use crate::pagination::{paginate, total_pages, Page, PageRequest};
pub use crate::rating::RatingCache;
pub use crate::service::{VendorSections, VendorService};
pub use crate::store::{AccountStore, Backends, CatalogStore, CouponStore, InMemoryStore, MetaScope, MetaStore};
pub use crate::vendor::{VendorProjector, VendorRecord};

/*
    Typical flow:
    1. Implement (or pick) the four accessors: AccountStore, MetaStore, CatalogStore, CouponStore.
    2. Bundle them into `Backends` (leave `catalog` as None if the commerce engine is off).
    3. Build one `VendorService` per process with a `BridgeConfig`; share it across requests.
    4. Per request, normalize client parameters at the boundary (`RoleFilter`, `PageRequest`,
       `SearchQuery`, `SectionsQuery`, `ProductListQuery`) and call the matching service method.
*/
