use async_trait::async_trait;

use forgefit_core::AppResult;
use forgefit_domain::Permission;

use super::principals::PrincipalRecord;
use super::roles::{RoleDefinition, RoleDraft, RoleUpdate};

/// Repository port for the seeded permission catalog.
#[async_trait]
pub trait PermissionCatalogRepository: Send + Sync {
    /// Lists every catalog permission.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;
}

/// Repository port for roles and their grants.
///
/// Implementations must apply every multi-row write as one atomic unit.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all roles ordered by name, each with resolved grants.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Finds a role by name.
    async fn find_role(&self, name: &str) -> AppResult<Option<RoleDefinition>>;

    /// Creates a custom role and its grants.
    ///
    /// Fails with `Conflict` for a duplicate name and `Validation` for an
    /// unknown permission id.
    async fn create_role(&self, draft: RoleDraft) -> AppResult<RoleDefinition>;

    /// Replaces the full grant set of a role and, when requested, its
    /// description in the same write.
    ///
    /// Fails with `NotFound` for a missing role and `Validation` for an unknown
    /// permission id, leaving the previous grants and description untouched.
    async fn update_role(&self, update: RoleUpdate) -> AppResult<()>;

    /// Updates the role description.
    async fn update_role_description(&self, name: &str, description: Option<&str>)
    -> AppResult<()>;

    /// Deletes a role together with its grants. Fails with `NotFound` when missing.
    async fn delete_role(&self, name: &str) -> AppResult<()>;
}

/// Repository port for principal records owned by user management.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Finds a principal by identifier.
    async fn find_principal(&self, user_id: &str) -> AppResult<Option<PrincipalRecord>>;

    /// Sets the single role of a principal. Fails with `NotFound` when either
    /// the principal or the role is missing.
    async fn set_principal_role(&self, user_id: &str, role_name: &str) -> AppResult<()>;
}
