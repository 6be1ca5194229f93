// server/src/db/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use tracing::{debug, instrument};
use vendor_bridge::store::{
  AccountId, AccountOrderBy, AccountPage, AccountQuery, AccountRecord, CommentQuery, CommentRecord, CouponRecord,
  MetaCompare, ProductId, ProductOrderBy, ProductQuery, ProductRecord, ProductStatus, SearchColumn,
};
use vendor_bridge::{AccountStore, BridgeError, BridgeResult, CatalogStore, CouponStore, MetaScope, MetaStore};

/// The four accessors over the tables in `schema.sql`.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

fn db_err(err: sqlx::Error) -> BridgeError {
  BridgeError::Store { source: err.into() }
}

// Postgres has no unsigned integers; ids are stored as BIGINT.
fn to_db(id: u64) -> i64 {
  id as i64
}

fn from_db(id: i64) -> u64 {
  id.max(0) as u64
}

fn like_pattern(term: &str) -> String {
  let escaped = term
    .trim_matches('*')
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  format!("%{}%", escaped)
}

fn status_names(statuses: &[ProductStatus]) -> Vec<String> {
  statuses.iter().map(|s| s.as_str().to_string()).collect()
}

#[derive(FromRow)]
struct AccountRow {
  id: i64,
  login: String,
  nicename: String,
  display_name: String,
  email: String,
  registered: DateTime<Utc>,
  roles: Vec<String>,
}

impl From<AccountRow> for AccountRecord {
  fn from(row: AccountRow) -> Self {
    AccountRecord {
      id: from_db(row.id),
      login: row.login,
      nicename: row.nicename,
      display_name: row.display_name,
      email: row.email,
      registered: row.registered,
      roles: row.roles,
    }
  }
}

#[derive(FromRow)]
struct ProductRow {
  id: i64,
  parent_id: i64,
  author_id: i64,
  name: String,
  slug: String,
  product_type: String,
  status: String,
  price: String,
  regular_price: String,
  sale_price: String,
  stock_status: String,
  average_rating: f64,
  rating_count: i64,
  image_id: i64,
  gallery_ids: Vec<i64>,
  created_at: DateTime<Utc>,
  total_sales: i64,
  menu_order: i64,
}

impl TryFrom<ProductRow> for ProductRecord {
  type Error = BridgeError;

  fn try_from(row: ProductRow) -> BridgeResult<Self> {
    let status = ProductStatus::parse(&row.status)
      .ok_or_else(|| BridgeError::Internal(format!("Product {} has unknown status '{}'", row.id, row.status)))?;
    Ok(ProductRecord {
      id: from_db(row.id),
      parent_id: from_db(row.parent_id),
      author: from_db(row.author_id),
      name: row.name,
      slug: row.slug,
      product_type: row.product_type,
      status,
      price: row.price,
      regular_price: row.regular_price,
      sale_price: row.sale_price,
      stock_status: row.stock_status,
      average_rating: row.average_rating,
      rating_count: from_db(row.rating_count),
      image_id: from_db(row.image_id),
      gallery_ids: row.gallery_ids.into_iter().map(from_db).collect(),
      created: row.created_at,
      total_sales: from_db(row.total_sales),
      menu_order: row.menu_order,
    })
  }
}

#[derive(FromRow)]
struct CommentRow {
  id: i64,
  post_id: i64,
  author_name: String,
  content: String,
  date_gmt: NaiveDateTime,
  approved: bool,
}

impl From<CommentRow> for CommentRecord {
  fn from(row: CommentRow) -> Self {
    CommentRecord {
      id: from_db(row.id),
      post_id: from_db(row.post_id),
      author_name: row.author_name,
      content: row.content,
      date_gmt: row.date_gmt,
      approved: row.approved,
    }
  }
}

const ACCOUNT_COLUMNS: &str = "SELECT a.id, a.login, a.nicename, a.display_name, a.email, a.registered, \
   COALESCE(ARRAY(SELECT r.role FROM account_roles r WHERE r.account_id = a.id ORDER BY r.role), '{}') AS roles \
   FROM accounts a WHERE TRUE";

const PRODUCT_COLUMNS: &str = "SELECT id, parent_id, author_id, name, slug, product_type, status, price, \
   regular_price, sale_price, stock_status, average_rating, rating_count, image_id, gallery_ids, created_at, \
   total_sales, menu_order FROM products";

// Everything except variations is a listed product.
const LISTED: &str = "product_type <> 'variation'";

fn meta_table(scope: MetaScope) -> (&'static str, &'static str) {
  match scope {
    MetaScope::Account => ("account_meta", "account_id"),
    MetaScope::Post => ("post_meta", "post_id"),
    MetaScope::Comment => ("comment_meta", "comment_id"),
  }
}

fn search_column(column: SearchColumn) -> &'static str {
  match column {
    SearchColumn::Login => "a.login",
    SearchColumn::Nicename => "a.nicename",
    SearchColumn::DisplayName => "a.display_name",
    SearchColumn::Email => "a.email",
  }
}

fn product_sort_expr(order_by: ProductOrderBy) -> &'static str {
  match order_by {
    ProductOrderBy::Date => "created_at",
    ProductOrderBy::Modified => "modified_at",
    ProductOrderBy::Id => "id",
    ProductOrderBy::Title => "LOWER(name)",
    ProductOrderBy::Slug => "slug",
    ProductOrderBy::Price => "CASE WHEN price ~ '^[0-9]+(\\.[0-9]+)?$' THEN price::numeric ELSE 0 END",
    ProductOrderBy::Popularity => "total_sales",
    ProductOrderBy::Rating => "average_rating",
    ProductOrderBy::MenuOrder => "menu_order",
  }
}

/// Appends the WHERE conditions shared by the account row and count queries.
fn push_account_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AccountQuery) {
  if !query.roles.is_empty() {
    qb.push(" AND EXISTS (SELECT 1 FROM account_roles r WHERE r.account_id = a.id AND r.role = ANY(");
    qb.push_bind(query.roles.clone());
    qb.push("))");
  }

  if let Some(search) = &query.search {
    if !search.columns.is_empty() {
      let pattern = like_pattern(&search.term);
      qb.push(" AND (");
      for (i, column) in search.columns.iter().enumerate() {
        if i > 0 {
          qb.push(" OR ");
        }
        qb.push(search_column(*column));
        qb.push(" ILIKE ");
        qb.push_bind(pattern.clone());
      }
      qb.push(")");
    }
  }

  if let Some(filter) = &query.meta {
    qb.push(" AND EXISTS (SELECT 1 FROM account_meta m WHERE m.account_id = a.id AND m.meta_key = ");
    qb.push_bind(filter.key.clone());
    match filter.compare {
      MetaCompare::Equals => {
        qb.push(" AND m.meta_value = ");
        qb.push_bind(filter.value.clone());
      }
      MetaCompare::Like => {
        qb.push(" AND m.meta_value ILIKE ");
        qb.push_bind(like_pattern(&filter.value));
      }
    }
    qb.push(")");
  }

  if let Some(include) = &query.include {
    qb.push(" AND a.id = ANY(");
    qb.push_bind(include.iter().map(|id| to_db(*id)).collect::<Vec<i64>>());
    qb.push(")");
  }
}

fn push_account_order(qb: &mut QueryBuilder<'_, Postgres>, query: &AccountQuery) {
  let dir = query.order.as_sql();
  match (query.order_by, &query.include) {
    (AccountOrderBy::Include, Some(include)) => {
      qb.push(" ORDER BY array_position(");
      qb.push_bind(include.iter().map(|id| to_db(*id)).collect::<Vec<i64>>());
      qb.push(", a.id)");
    }
    (AccountOrderBy::DisplayName, _) => {
      qb.push(format!(" ORDER BY LOWER(a.display_name) {dir}, a.id {dir}"));
    }
    (AccountOrderBy::Registered, _) => {
      qb.push(format!(" ORDER BY a.registered {dir}, a.id {dir}"));
    }
    (AccountOrderBy::Login, _) => {
      qb.push(format!(" ORDER BY a.login {dir}, a.id {dir}"));
    }
    (AccountOrderBy::Id, _) | (AccountOrderBy::Include, None) => {
      qb.push(format!(" ORDER BY a.id {dir}"));
    }
  }
}

// LIMIT/OFFSET binds are BIGINT; anything larger pins to i64::MAX, which still reads past the end.
fn to_bigint(n: usize) -> i64 {
  i64::try_from(n).unwrap_or(i64::MAX)
}

fn push_limit(qb: &mut QueryBuilder<'_, Postgres>, limit: Option<usize>, offset: usize) {
  if let Some(limit) = limit {
    qb.push(" LIMIT ");
    qb.push_bind(to_bigint(limit));
    qb.push(" OFFSET ");
    qb.push_bind(to_bigint(offset));
  }
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    Ok(Self::new(pool))
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

#[async_trait]
impl MetaStore for PgStore {
  async fn get(&self, scope: MetaScope, id: u64, key: &str) -> BridgeResult<Option<String>> {
    let (table, id_column) = meta_table(scope);
    let sql = format!("SELECT meta_value FROM {table} WHERE {id_column} = $1 AND meta_key = $2 LIMIT 1");
    sqlx::query_scalar::<_, String>(&sql)
      .bind(to_db(id))
      .bind(key)
      .fetch_optional(&self.pool)
      .await
      .map_err(db_err)
  }

  async fn get_many(&self, scope: MetaScope, id: u64, keys: &[&str]) -> BridgeResult<HashMap<String, String>> {
    let (table, id_column) = meta_table(scope);
    let sql = format!("SELECT meta_key, meta_value FROM {table} WHERE {id_column} = $1 AND meta_key = ANY($2)");
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    let rows = sqlx::query_as::<_, (String, String)>(&sql)
      .bind(to_db(id))
      .bind(keys)
      .fetch_all(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(rows.into_iter().collect())
  }
}

#[async_trait]
impl AccountStore for PgStore {
  async fn find(&self, id: AccountId) -> BridgeResult<Option<AccountRecord>> {
    let mut qb = QueryBuilder::<Postgres>::new(ACCOUNT_COLUMNS);
    qb.push(" AND a.id = ");
    qb.push_bind(to_db(id));
    let row = qb
      .build_query_as::<AccountRow>()
      .fetch_optional(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(row.map(AccountRecord::from))
  }

  #[instrument(name = "PgStore::query_accounts", skip(self, query))]
  async fn query(&self, query: &AccountQuery) -> BridgeResult<AccountPage> {
    let mut rows_qb = QueryBuilder::<Postgres>::new(ACCOUNT_COLUMNS);
    push_account_filters(&mut rows_qb, query);
    push_account_order(&mut rows_qb, query);
    push_limit(&mut rows_qb, query.limit, query.offset());
    let rows = rows_qb
      .build_query_as::<AccountRow>()
      .fetch_all(&self.pool)
      .await
      .map_err(db_err)?;

    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM accounts a WHERE TRUE");
    push_account_filters(&mut count_qb, query);
    let total: i64 = count_qb
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(db_err)?;

    debug!(returned = rows.len(), total, "Account query done.");
    Ok(AccountPage {
      accounts: rows.into_iter().map(AccountRecord::from).collect(),
      total: from_db(total),
    })
  }
}

#[async_trait]
impl CatalogStore for PgStore {
  async fn product(&self, id: ProductId) -> BridgeResult<Option<ProductRecord>> {
    let sql = format!("{PRODUCT_COLUMNS} WHERE id = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
      .bind(to_db(id))
      .fetch_optional(&self.pool)
      .await
      .map_err(db_err)?;
    row.map(ProductRecord::try_from).transpose()
  }

  async fn product_ids(&self, query: &ProductQuery) -> BridgeResult<Vec<ProductId>> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM products WHERE author_id = ");
    qb.push_bind(to_db(query.author));
    qb.push(format!(" AND {LISTED}"));
    if !query.statuses.is_empty() {
      qb.push(" AND status = ANY(");
      qb.push_bind(status_names(&query.statuses));
      qb.push(")");
    }
    let dir = query.order.as_sql();
    qb.push(format!(" ORDER BY {} {dir}, id {dir}", product_sort_expr(query.order_by)));
    push_limit(&mut qb, query.limit, query.offset());

    let ids: Vec<i64> = qb.build_query_scalar().fetch_all(&self.pool).await.map_err(db_err)?;
    Ok(ids.into_iter().map(from_db).collect())
  }

  async fn count_products(&self, author: AccountId, statuses: &[ProductStatus]) -> BridgeResult<u64> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products WHERE author_id = ");
    qb.push_bind(to_db(author));
    qb.push(format!(" AND {LISTED}"));
    if !statuses.is_empty() {
      qb.push(" AND status = ANY(");
      qb.push_bind(status_names(statuses));
      qb.push(")");
    }
    let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await.map_err(db_err)?;
    Ok(from_db(count))
  }

  async fn author_product_counts(&self, status: ProductStatus) -> BridgeResult<Vec<(AccountId, u64)>> {
    let sql = format!("SELECT author_id, COUNT(*) FROM products WHERE status = $1 AND {LISTED} GROUP BY author_id");
    let rows = sqlx::query_as::<_, (i64, i64)>(&sql)
      .bind(status.as_str())
      .fetch_all(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(rows.into_iter().map(|(author, count)| (from_db(author), from_db(count))).collect())
  }

  async fn attachment_url(&self, attachment_id: u64) -> BridgeResult<Option<String>> {
    sqlx::query_scalar::<_, String>("SELECT url FROM attachments WHERE id = $1")
      .bind(to_db(attachment_id))
      .fetch_optional(&self.pool)
      .await
      .map_err(db_err)
  }

  async fn comments(&self, query: &CommentQuery) -> BridgeResult<Vec<CommentRecord>> {
    let mut qb = QueryBuilder::<Postgres>::new(
      "SELECT c.id, c.post_id, c.author_name, c.content, c.date_gmt, c.approved \
       FROM comments c JOIN products p ON p.id = c.post_id \
       WHERE c.approved AND p.product_type <> 'variation' AND p.author_id = ",
    );
    qb.push_bind(to_db(query.post_author));
    qb.push(" AND p.status = ");
    qb.push_bind(query.post_status.as_str());
    qb.push(" ORDER BY c.date_gmt DESC, c.id DESC");
    push_limit(&mut qb, query.limit, query.offset());

    let rows = qb
      .build_query_as::<CommentRow>()
      .fetch_all(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(rows.into_iter().map(CommentRecord::from).collect())
  }

  async fn count_comments(&self, query: &CommentQuery) -> BridgeResult<u64> {
    let count: i64 = sqlx::query_scalar(
      "SELECT COUNT(*) FROM comments c JOIN products p ON p.id = c.post_id \
       WHERE c.approved AND p.product_type <> 'variation' AND p.author_id = $1 AND p.status = $2",
    )
    .bind(to_db(query.post_author))
    .bind(query.post_status.as_str())
    .fetch_one(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(from_db(count))
  }
}

#[async_trait]
impl CouponStore for PgStore {
  async fn coupons_by_author(&self, author: AccountId) -> BridgeResult<Vec<CouponRecord>> {
    let rows = sqlx::query_as::<_, (i64, i64, String)>(
      "SELECT id, author_id, code FROM coupons WHERE author_id = $1 ORDER BY id DESC",
    )
    .bind(to_db(author))
    .fetch_all(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(
      rows
        .into_iter()
        .map(|(id, author, code)| CouponRecord {
          id: from_db(id),
          author: from_db(author),
          code,
        })
        .collect(),
    )
  }
}
