use std::sync::Arc;

use async_trait::async_trait;
use forgefit_core::AppResult;
use forgefit_domain::Permission;

mod permissions;
mod tiers;


/// Repository port for principal role and grant lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Returns the live role name of a principal, or `None` when unassigned or unknown.
    async fn find_principal_role(&self, user_id: &str) -> AppResult<Option<String>>;

    /// Lists permissions granted to a role. A missing role grants nothing.
    async fn list_role_permissions(&self, role_name: &str) -> AppResult<Vec<Permission>>;
}

/// Application service answering allow/deny questions for principals.
///
/// Every call re-reads storage; there is no cache between the caller and the
/// role store.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }
}
