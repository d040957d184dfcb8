use forgefit_domain::{Permission, PermissionId, RoleName};

/// Role definition returned to callers, with resolved grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Unique role name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Indicates a built-in role.
    pub is_system: bool,
    /// Granted permissions in catalog order.
    pub permissions: Vec<Permission>,
    /// Creation timestamp in RFC3339.
    pub created_at: String,
    /// Last modification timestamp in RFC3339.
    pub updated_at: String,
}

/// Input payload for creating custom roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Requested role name, validated by the role store.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Catalog permissions granted to the new role.
    pub permission_ids: Vec<PermissionId>,
}

/// Input payload for editing an existing role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Full replacement grant set.
    pub permission_ids: Vec<PermissionId>,
    /// Optional replacement description.
    pub description: Option<String>,
}

/// Validated role ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    /// Validated role name.
    pub name: RoleName,
    /// Normalised description, `None` when blank.
    pub description: Option<String>,
    /// Distinct permission identifiers in input order.
    pub permission_ids: Vec<PermissionId>,
}

/// Validated edit of an existing role, applied by the repository as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleUpdate {
    /// Name of the role being edited.
    pub name: RoleName,
    /// Distinct replacement grant set.
    pub permission_ids: Vec<PermissionId>,
    /// `None` keeps the stored description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
}
