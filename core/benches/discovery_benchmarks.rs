use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime; // To run async code within Criterion
use vendor_bridge::discovery::{RoleFilter, SearchQuery, SectionsQuery};
use vendor_bridge::store::{AccountRecord, ProductRecord, ProductStatus};
use vendor_bridge::vendor::keys;
use vendor_bridge::{Backends, BridgeConfig, InMemoryStore, MetaScope, PageRequest, VendorService};

// --- Fixture: a marketplace with `vendors` accounts and a few products each ---
fn marketplace(vendors: u64) -> Arc<InMemoryStore> {
  let store = Arc::new(InMemoryStore::new());
  for id in 1..=vendors {
    store.insert_account(AccountRecord {
      id,
      login: format!("vendor{}", id),
      nicename: format!("vendor-{}", id),
      display_name: format!("Vendor {}", id),
      email: format!("vendor{}@example.com", id),
      registered: Utc.timestamp_opt(1_700_000_000 + id as i64 * 60, 0).unwrap(),
      roles: vec![keys::DEFAULT_VENDOR_ROLE.to_string()],
    });
    if id % 4 == 0 {
      store.set_meta(MetaScope::Account, id, keys::FEATURED, "1");
    }
    if id % 3 == 0 {
      store.set_meta(MetaScope::Account, id, keys::BILLING_COMPANY, format!("Workshop {}", id));
    }
    // Product counts vary so the authorship ranking has real work to do.
    for n in 0..(id % 7) {
      let product_id = id * 100 + n;
      store.insert_product(ProductRecord {
        id: product_id,
        parent_id: 0,
        author: id,
        name: format!("Item {}", product_id),
        slug: format!("item-{}", product_id),
        product_type: "simple".to_string(),
        status: ProductStatus::Publish,
        price: "9.99".to_string(),
        regular_price: "9.99".to_string(),
        sale_price: String::new(),
        stock_status: "instock".to_string(),
        average_rating: (n % 6) as f64,
        rating_count: n,
        image_id: 0,
        gallery_ids: Vec::new(),
        created: Utc.timestamp_opt(1_700_000_000 + product_id as i64, 0).unwrap(),
        total_sales: 0,
        menu_order: 0,
      });
    }
  }
  store
}

fn service(store: &Arc<InMemoryStore>, rating_ttl: Duration) -> Arc<VendorService> {
  let config = BridgeConfig::default().with_rating_ttl(rating_ttl);
  Arc::new(VendorService::new(Backends::from_store(store.clone()), config))
}

// --- Benchmark Functions ---

fn bench_vendor_listing(c: &mut Criterion) {
  let mut group = c.benchmark_group("VendorListing");
  let rt = Runtime::new().unwrap();

  for vendors in [100u64, 1_000].iter() {
    let store = marketplace(*vendors);
    let svc = service(&store, Duration::from_secs(600));
    group.throughput(Throughput::Elements(20)); // one page

    group.bench_with_input(BenchmarkId::new("authorship", vendors), vendors, |b, _| {
      b.to_async(&rt).iter(|| {
        let svc = svc.clone();
        async move {
          svc
            .list_vendors(&RoleFilter::default(), PageRequest::new(1, 20))
            .await
            .unwrap()
        }
      });
    });

    let roles = RoleFilter::new([keys::DEFAULT_VENDOR_ROLE]);
    group.bench_with_input(BenchmarkId::new("role", vendors), vendors, |b, _| {
      b.to_async(&rt).iter(|| {
        let svc = svc.clone();
        let roles = roles.clone();
        async move { svc.list_vendors(&roles, PageRequest::new(1, 20)).await.unwrap() }
      });
    });
  }
  group.finish();
}

fn bench_vendor_search(c: &mut Criterion) {
  let mut group = c.benchmark_group("VendorSearch");
  let rt = Runtime::new().unwrap();
  let store = marketplace(1_000);
  let svc = service(&store, Duration::from_secs(600));

  for with_products_only in [false, true].iter() {
    let query = SearchQuery::new(Some("workshop 1"), PageRequest::new(1, 20), *with_products_only).unwrap();
    group.bench_with_input(
      BenchmarkId::new("store_name_term", with_products_only),
      with_products_only,
      |b, _| {
        b.to_async(&rt).iter(|| {
          let svc = svc.clone();
          let query = query.clone();
          async move { svc.search_vendors(&query).await.unwrap() }
        });
      },
    );
  }
  group.finish();
}

fn bench_sections_rating_cache(c: &mut Criterion) {
  let mut group = c.benchmark_group("Sections");
  let rt = Runtime::new().unwrap();
  let store = marketplace(500);

  // A zero TTL forces every rating to be recomputed; the warm service answers from cache.
  let cold = service(&store, Duration::ZERO);
  let warm = service(&store, Duration::from_secs(600));
  rt.block_on(warm.vendor_sections(SectionsQuery::default())).unwrap();

  group.bench_function("cold_rating_cache", |b| {
    b.to_async(&rt).iter(|| {
      let svc = cold.clone();
      async move { svc.vendor_sections(SectionsQuery::default()).await.unwrap() }
    });
  });
  group.bench_function("warm_rating_cache", |b| {
    b.to_async(&rt).iter(|| {
      let svc = warm.clone();
      async move { svc.vendor_sections(SectionsQuery::default()).await.unwrap() }
    });
  });
  group.finish();
}

criterion_group!(
  benches,
  bench_vendor_listing,
  bench_vendor_search,
  bench_sections_rating_cache
);
criterion_main!(benches);
