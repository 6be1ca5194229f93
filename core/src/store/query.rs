// core/src/store/query.rs

//! Query descriptions handed to the accessors. Backends translate them into their own
//! query language; the in-memory store evaluates them directly.

use super::record::{AccountId, ProductStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  #[default]
  Asc,
  Desc,
}

impl SortOrder {
  /// Anything other than a case-insensitive `ASC` / `DESC` falls back to `default`.
  pub fn parse_or(raw: Option<&str>, default: SortOrder) -> SortOrder {
    match raw.map(|r| r.trim().to_ascii_uppercase()) {
      Some(r) if r == "ASC" => SortOrder::Asc,
      Some(r) if r == "DESC" => SortOrder::Desc,
      _ => default,
    }
  }

  pub fn as_sql(&self) -> &'static str {
    match self {
      SortOrder::Asc => "ASC",
      SortOrder::Desc => "DESC",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountOrderBy {
  #[default]
  DisplayName,
  Registered,
  /// The account store's natural order when a caller asks for none.
  Login,
  /// Preserve the order of `AccountQuery::include`.
  Include,
  Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchColumn {
  Login,
  Nicename,
  DisplayName,
  Email,
}

impl SearchColumn {
  pub const ALL: [SearchColumn; 4] = [
    SearchColumn::Login,
    SearchColumn::Nicename,
    SearchColumn::DisplayName,
    SearchColumn::Email,
  ];
}

/// Case-insensitive substring match over a set of account columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSearch {
  pub term: String,
  pub columns: Vec<SearchColumn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCompare {
  Equals,
  /// Case-insensitive substring match.
  Like,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaFilter {
  pub key: String,
  pub value: String,
  pub compare: MetaCompare,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountQuery {
  pub roles: Vec<String>,
  pub search: Option<AccountSearch>,
  pub meta: Option<MetaFilter>,
  pub include: Option<Vec<AccountId>>,
  pub order_by: AccountOrderBy,
  pub order: SortOrder,
  /// `None` returns every match.
  pub limit: Option<usize>,
  /// 1-based; ignored when `limit` is `None`.
  pub page: usize,
}

impl Default for AccountQuery {
  fn default() -> Self {
    Self {
      roles: Vec::new(),
      search: None,
      meta: None,
      include: None,
      order_by: AccountOrderBy::DisplayName,
      order: SortOrder::Asc,
      limit: None,
      page: 1,
    }
  }
}

impl AccountQuery {
  pub fn with_roles(mut self, roles: Vec<String>) -> Self {
    self.roles = roles;
    self
  }

  pub fn with_search(mut self, term: impl Into<String>, columns: &[SearchColumn]) -> Self {
    self.search = Some(AccountSearch {
      term: term.into(),
      columns: columns.to_vec(),
    });
    self
  }

  pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>, compare: MetaCompare) -> Self {
    self.meta = Some(MetaFilter {
      key: key.into(),
      value: value.into(),
      compare,
    });
    self
  }

  pub fn including(mut self, ids: Vec<AccountId>) -> Self {
    self.include = Some(ids);
    self.order_by = AccountOrderBy::Include;
    self
  }

  pub fn ordered_by(mut self, order_by: AccountOrderBy, order: SortOrder) -> Self {
    self.order_by = order_by;
    self.order = order;
    self
  }

  pub fn limited(mut self, limit: usize, page: usize) -> Self {
    self.limit = Some(limit.max(1));
    self.page = page.max(1);
    self
  }

  /// Zero-based offset of the first row of the requested page.
  pub fn offset(&self) -> usize {
    match self.limit {
      Some(limit) => (self.page.max(1) - 1).saturating_mul(limit),
      None => 0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrderBy {
  #[default]
  Date,
  Id,
  Title,
  Slug,
  Price,
  Popularity,
  Rating,
  Modified,
  MenuOrder,
}

impl ProductOrderBy {
  /// Unknown keys normalize to `Date`.
  pub fn parse(raw: Option<&str>) -> ProductOrderBy {
    match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
      Some("id") => ProductOrderBy::Id,
      Some("title") | Some("name") => ProductOrderBy::Title,
      Some("slug") => ProductOrderBy::Slug,
      Some("price") => ProductOrderBy::Price,
      Some("popularity") => ProductOrderBy::Popularity,
      Some("rating") => ProductOrderBy::Rating,
      Some("modified") => ProductOrderBy::Modified,
      Some("menu_order") => ProductOrderBy::MenuOrder,
      _ => ProductOrderBy::Date,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
  pub author: AccountId,
  /// Empty matches every status.
  pub statuses: Vec<ProductStatus>,
  pub order_by: ProductOrderBy,
  pub order: SortOrder,
  pub limit: Option<usize>,
  pub page: usize,
}

impl ProductQuery {
  pub fn by_author(author: AccountId) -> Self {
    Self {
      author,
      statuses: vec![ProductStatus::Publish],
      order_by: ProductOrderBy::Date,
      order: SortOrder::Desc,
      limit: None,
      page: 1,
    }
  }

  pub fn with_statuses(mut self, statuses: Vec<ProductStatus>) -> Self {
    self.statuses = statuses;
    self
  }

  pub fn ordered_by(mut self, order_by: ProductOrderBy, order: SortOrder) -> Self {
    self.order_by = order_by;
    self.order = order;
    self
  }

  pub fn limited(mut self, limit: usize, page: usize) -> Self {
    self.limit = Some(limit.max(1));
    self.page = page.max(1);
    self
  }

  pub fn offset(&self) -> usize {
    match self.limit {
      Some(limit) => (self.page.max(1) - 1).saturating_mul(limit),
      None => 0,
    }
  }
}

/// Approved comments left on a vendor's products, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentQuery {
  pub post_author: AccountId,
  pub post_status: ProductStatus,
  pub limit: Option<usize>,
  pub page: usize,
}

impl CommentQuery {
  pub fn for_vendor(post_author: AccountId) -> Self {
    Self {
      post_author,
      post_status: ProductStatus::Publish,
      limit: None,
      page: 1,
    }
  }

  pub fn limited(mut self, limit: usize, page: usize) -> Self {
    self.limit = Some(limit.max(1));
    self.page = page.max(1);
    self
  }

  pub fn offset(&self) -> usize {
    match self.limit {
      Some(limit) => (self.page.max(1) - 1).saturating_mul(limit),
      None => 0,
    }
  }
}
