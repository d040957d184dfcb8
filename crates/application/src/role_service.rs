use std::collections::HashSet;
use std::sync::Arc;

use forgefit_core::{AppError, AppResult};
use forgefit_domain::{PermissionId, RoleName};

use crate::{CreateRoleInput, RoleDefinition, RoleDraft, RoleRepository, RoleUpdate};

/// Role store rules layered over the role repository.
///
/// Built-in protections are checked by name before storage is consulted, so
/// `admin` stays immutable even if its `is_system` flag were ever cleared.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
}

impl RoleService {
    /// Creates a role service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Creates a custom role with the given grants.
    pub async fn create(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        let draft = RoleDraft {
            name: RoleName::new(input.name)?,
            description: normalize_description(input.description),
            permission_ids: distinct_ids(input.permission_ids),
        };

        self.repository.create_role(draft).await
    }

    /// Returns a role with resolved grants.
    pub async fn get_by_name(&self, name: &str) -> AppResult<RoleDefinition> {
        let name = existing_role_name(name)?;
        self.repository
            .find_role(name.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' was not found")))
    }

    /// Returns every role ordered by name.
    pub async fn list_all(&self) -> AppResult<Vec<RoleDefinition>> {
        self.repository.list_roles().await
    }

    /// Atomically replaces the grant set of a role.
    pub async fn update_permissions(
        &self,
        name: &str,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<()> {
        let name = existing_role_name(name)?;
        if name.is_edit_protected() {
            return Err(AppError::Forbidden(format!("role '{name}' cannot be edited")));
        }

        self.repository
            .update_role(RoleUpdate {
                name,
                permission_ids: distinct_ids(permission_ids),
                description: None,
            })
            .await
    }

    /// Replaces the grant set and, for custom roles, the description in one write.
    ///
    /// A description sent for a system role is dropped; the grants are still replaced.
    pub async fn update(
        &self,
        name: &str,
        permission_ids: Vec<PermissionId>,
        description: Option<String>,
    ) -> AppResult<()> {
        let name = existing_role_name(name)?;
        if name.is_edit_protected() {
            return Err(AppError::Forbidden(format!("role '{name}' cannot be edited")));
        }

        let role = self
            .repository
            .find_role(name.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' was not found")))?;
        let description = if role.is_system {
            None
        } else {
            description.map(|value| normalize_description(Some(value)))
        };

        self.repository
            .update_role(RoleUpdate {
                name,
                permission_ids: distinct_ids(permission_ids),
                description,
            })
            .await
    }

    /// Updates the description of a custom role. System roles are refused.
    pub async fn update_description(
        &self,
        name: &str,
        description: Option<String>,
    ) -> AppResult<()> {
        let role = self.get_by_name(name).await?;
        if role.is_system {
            return Err(AppError::Forbidden(format!(
                "system role '{}' description cannot be changed",
                role.name
            )));
        }

        let description = normalize_description(description);
        self.repository
            .update_role_description(role.name.as_str(), description.as_deref())
            .await
    }

    /// Deletes a custom role and its grants.
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        let name = existing_role_name(name)?;
        if name.is_delete_protected() {
            return Err(AppError::Forbidden(format!("role '{name}' cannot be deleted")));
        }

        let role = self.get_by_name(name.as_str()).await?;
        if role.is_system {
            return Err(AppError::Forbidden(format!(
                "system role '{name}' cannot be deleted"
            )));
        }

        self.repository.delete_role(name.as_str()).await
    }
}

/// A name that fails validation can never have been stored.
fn existing_role_name(name: &str) -> AppResult<RoleName> {
    RoleName::new(name)
        .map_err(|_| AppError::NotFound(format!("role '{}' was not found", name.trim())))
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn distinct_ids(permission_ids: Vec<PermissionId>) -> Vec<PermissionId> {
    let mut seen = HashSet::new();
    permission_ids
        .into_iter()
        .filter(|permission_id| seen.insert(*permission_id))
        .collect()
}
