// core/src/discovery/role.rs

use crate::error::BridgeResult;
use crate::pagination::{Page, PageRequest};
use crate::store::{AccountOrderBy, AccountQuery, AccountRecord, Backends, SortOrder};
use tracing::{debug, instrument};

/// Role names requested by a client. Scalar and list forms both land here; blanks and
/// duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter(Vec<String>);

impl RoleFilter {
  pub fn new<I, S>(roles: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut normalized: Vec<String> = Vec::new();
    for role in roles {
      let role = role.as_ref().trim();
      if !role.is_empty() && !normalized.iter().any(|r| r == role) {
        normalized.push(role.to_string());
      }
    }
    Self(normalized)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn roles(&self) -> &[String] {
    &self.0
  }
}

/// Accounts with any of the roles, by display name. The account store pages and counts.
#[instrument(name = "discovery::by_role", skip(backends), fields(roles = ?roles.roles()))]
pub async fn discover_by_role(
  backends: &Backends,
  roles: &RoleFilter,
  request: PageRequest,
) -> BridgeResult<Page<AccountRecord>> {
  let query = AccountQuery::default()
    .with_roles(roles.roles().to_vec())
    .ordered_by(AccountOrderBy::DisplayName, SortOrder::Asc)
    .limited(request.per_page, request.page);
  let result = backends.accounts.query(&query).await?;
  debug!(total = result.total, returned = result.accounts.len(), "Role discovery done.");
  Ok(Page::from_slice(result.accounts, result.total, request))
}
