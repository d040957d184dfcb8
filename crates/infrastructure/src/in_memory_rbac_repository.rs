use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use forgefit_application::{
    AuditEvent, AuditRepository, AuthorizationRepository, PermissionCatalogRepository,
    PrincipalRecord, PrincipalRepository, RoleDefinition, RoleDraft, RoleRepository, RoleUpdate,
};
use forgefit_core::{AppError, AppResult};
use forgefit_domain::{
    ADMIN_ROLE, Permission, PermissionId, PermissionKey, SUPER_ROLE, USER_ROLE, sort_catalog,
};


/// Default catalog as `(group, resource, action, display name)`.
const DEFAULT_CATALOG: &[(&str, &str, &str, &str)] = &[
    ("content_moderation", "exerciseSetup", "create", "Create exercise setups"),
    ("content_moderation", "exerciseSetup", "read", "View exercise setups"),
    ("content_moderation", "exerciseSetup", "update", "Edit exercise setups"),
    ("content_moderation", "exerciseSetup", "delete", "Delete exercise setups"),
    ("content_moderation", "exerciseSetup", "publish", "Publish exercise setups"),
    ("demo_centers", "demoCenter", "create", "Create demo centers"),
    ("demo_centers", "demoCenter", "read", "View demo centers"),
    ("demo_centers", "demoCenter", "update", "Edit demo centers"),
    ("demo_centers", "demoCenter", "delete", "Delete demo centers"),
    ("rewards", "rewards", "read", "View rewards balances"),
    ("rewards", "rewards", "adjust", "Adjust rewards balances"),
    ("user_management", "users", "read", "View users"),
    ("user_management", "users", "update", "Edit users"),
    ("user_management", "users", "delete", "Delete users"),
    ("user_management", "roles", "read", "View roles"),
    ("user_management", "roles", "manage", "Manage roles"),
    ("media", "videos", "upload", "Upload videos"),
    ("media", "videos", "delete", "Delete videos"),
];

/// System roles as `(name, description)`, matching the SQL seed.
const SYSTEM_ROLE_SEED: &[(&str, &str)] = &[
    (ADMIN_ROLE, "Full administrative access"),
    (SUPER_ROLE, "Manages the permission catalog and custom roles"),
    (USER_ROLE, "Default role for registered members"),
];

/// Grants of the `user` system role in the default seed.
const DEFAULT_USER_GRANTS: &[&str] = &["exerciseSetup:read", "demoCenter:read", "rewards:read"];

#[derive(Debug, Clone)]
struct RoleEntry {
    description: Option<String>,
    is_system: bool,
    permission_ids: Vec<PermissionId>,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Default)]
struct RbacState {
    permissions: Vec<Permission>,
    roles: BTreeMap<String, RoleEntry>,
    principals: HashMap<String, PrincipalRecord>,
    audit_events: Vec<AuditEvent>,
}

impl RbacState {
    fn unknown_permission(&self, permission_ids: &[PermissionId]) -> Option<PermissionId> {
        permission_ids.iter().copied().find(|permission_id| {
            !self
                .permissions
                .iter()
                .any(|permission| permission.id() == *permission_id)
        })
    }

    fn resolve(&self, permission_ids: &[PermissionId]) -> Vec<Permission> {
        let mut resolved: Vec<Permission> = self
            .permissions
            .iter()
            .filter(|permission| permission_ids.contains(&permission.id()))
            .cloned()
            .collect();
        sort_catalog(&mut resolved);
        resolved
    }

    fn definition(&self, name: &str, entry: &RoleEntry) -> RoleDefinition {
        RoleDefinition {
            name: name.to_owned(),
            description: entry.description.clone(),
            is_system: entry.is_system,
            permissions: self.resolve(&entry.permission_ids),
            created_at: entry.created_at.clone(),
            updated_at: entry.updated_at.clone(),
        }
    }
}

/// In-memory implementation of every RBAC port.
///
/// All state sits behind one lock, so each multi-step write is observed
/// atomically by readers.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    state: RwLock<RbacState>,
}

impl InMemoryRbacRepository {
    /// Creates an empty repository with no catalog, roles or principals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the default catalog and system roles.
    ///
    /// `admin` and `super` receive every permission; `user` receives read
    /// access to exercise setups, demo centers and rewards.
    pub fn seeded() -> AppResult<Self> {
        let mut permissions = Vec::with_capacity(DEFAULT_CATALOG.len());
        for (group, resource, action, display_name) in DEFAULT_CATALOG {
            let key = PermissionKey::new(*resource, *action)?;
            permissions.push(Permission::new(
                PermissionId::new(),
                key,
                *display_name,
                *group,
            )?);
        }

        let user_keys = PermissionKey::parse_all(DEFAULT_USER_GRANTS)?;
        let all_ids: Vec<PermissionId> = permissions.iter().map(Permission::id).collect();
        let user_ids: Vec<PermissionId> = permissions
            .iter()
            .filter(|permission| user_keys.contains(permission.key()))
            .map(Permission::id)
            .collect();

        let now = Utc::now().to_rfc3339();
        let roles = SYSTEM_ROLE_SEED
            .iter()
            .map(|(name, description)| {
                let permission_ids = if *name == USER_ROLE {
                    user_ids.clone()
                } else {
                    all_ids.clone()
                };
                let entry = RoleEntry {
                    description: Some((*description).to_owned()),
                    is_system: true,
                    permission_ids,
                    created_at: now.clone(),
                    updated_at: now.clone(),
                };
                ((*name).to_owned(), entry)
            })
            .collect();

        Ok(Self {
            state: RwLock::new(RbacState {
                permissions,
                roles,
                ..RbacState::default()
            }),
        })
    }

    /// Inserts or replaces a principal record.
    pub async fn insert_principal(&self, principal: PrincipalRecord) {
        self.state
            .write()
            .await
            .principals
            .insert(principal.user_id.clone(), principal);
    }

    /// Returns every audit event appended so far, oldest first.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.read().await.audit_events.clone()
    }
}

#[async_trait]
impl PermissionCatalogRepository for InMemoryRbacRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let mut permissions = self.state.read().await.permissions.clone();
        sort_catalog(&mut permissions);
        Ok(permissions)
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .iter()
            .map(|(name, entry)| state.definition(name, entry))
            .collect())
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .get(name)
            .map(|entry| state.definition(name, entry)))
    }

    async fn create_role(&self, draft: RoleDraft) -> AppResult<RoleDefinition> {
        let mut state = self.state.write().await;

        if state.roles.contains_key(draft.name.as_str()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                draft.name
            )));
        }
        if let Some(permission_id) = state.unknown_permission(&draft.permission_ids) {
            return Err(AppError::Validation(format!(
                "unknown permission id '{permission_id}'"
            )));
        }

        let now = Utc::now().to_rfc3339();
        let entry = RoleEntry {
            description: draft.description,
            is_system: false,
            permission_ids: draft.permission_ids,
            created_at: now.clone(),
            updated_at: now,
        };
        let definition = state.definition(draft.name.as_str(), &entry);
        state.roles.insert(draft.name.into(), entry);

        Ok(definition)
    }

    async fn update_role(&self, update: RoleUpdate) -> AppResult<()> {
        let mut state = self.state.write().await;

        if !state.roles.contains_key(update.name.as_str()) {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                update.name
            )));
        }
        if let Some(permission_id) = state.unknown_permission(&update.permission_ids) {
            return Err(AppError::Validation(format!(
                "unknown permission id '{permission_id}'"
            )));
        }

        let mut distinct = Vec::with_capacity(update.permission_ids.len());
        for permission_id in update.permission_ids {
            if !distinct.contains(&permission_id) {
                distinct.push(permission_id);
            }
        }

        if let Some(entry) = state.roles.get_mut(update.name.as_str()) {
            entry.permission_ids = distinct;
            if let Some(description) = update.description {
                entry.description = description;
            }
            entry.updated_at = Utc::now().to_rfc3339();
        }
        Ok(())
    }

    async fn update_role_description(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let entry = state
            .roles
            .get_mut(name)
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' was not found")))?;

        entry.description = description.map(ToOwned::to_owned);
        entry.updated_at = Utc::now().to_rfc3339();
        Ok(())
    }

    async fn delete_role(&self, name: &str) -> AppResult<()> {
        self.state
            .write()
            .await
            .roles
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' was not found")))
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryRbacRepository {
    async fn find_principal_role(&self, user_id: &str) -> AppResult<Option<String>> {
        Ok(self
            .state
            .read()
            .await
            .principals
            .get(user_id)
            .and_then(|principal| principal.role.clone()))
    }

    async fn list_role_permissions(&self, role_name: &str) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .get(role_name)
            .map(|entry| state.resolve(&entry.permission_ids))
            .unwrap_or_default())
    }
}

#[async_trait]
impl PrincipalRepository for InMemoryRbacRepository {
    async fn find_principal(&self, user_id: &str) -> AppResult<Option<PrincipalRecord>> {
        Ok(self.state.read().await.principals.get(user_id).cloned())
    }

    async fn set_principal_role(&self, user_id: &str, role_name: &str) -> AppResult<()> {
        let mut state = self.state.write().await;

        if !state.roles.contains_key(role_name) {
            return Err(AppError::NotFound(format!(
                "role '{role_name}' was not found"
            )));
        }
        let principal = state
            .principals
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;

        principal.role = Some(role_name.to_owned());
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for InMemoryRbacRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.write().await.audit_events.push(event);
        Ok(())
    }
}
