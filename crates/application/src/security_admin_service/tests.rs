use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use forgefit_core::{AppError, AppResult, UserIdentity};
use forgefit_domain::{AuditAction, Permission, PermissionId, PermissionKey};

use crate::{
    AuditEvent, AuditRepository, AuthorizationRepository, AuthorizationService, CreateRoleInput,
    PermissionCatalogRepository, PermissionCatalogService, PrincipalRecord, PrincipalRepository,
    RoleDefinition, RoleDraft, RoleRepository, RoleService, RoleUpdate, UpdateRoleInput,
};

use super::SecurityAdminService;

#[derive(Clone)]
struct StoredRole {
    description: Option<String>,
    is_system: bool,
    permission_ids: Vec<PermissionId>,
}

struct FakeRbacStore {
    catalog: Vec<Permission>,
    roles: Mutex<BTreeMap<String, StoredRole>>,
    principals: Mutex<HashMap<String, Option<String>>>,
    events: Mutex<Vec<AuditEvent>>,
    fail_role_updates: AtomicBool,
    fail_description_writes: AtomicBool,
}

impl FakeRbacStore {
    fn new(catalog: Vec<Permission>, principals: &[(&str, &str)]) -> Self {
        let roles = ["admin", "super", "user"]
            .into_iter()
            .map(|name| {
                (
                    name.to_owned(),
                    StoredRole {
                        description: None,
                        is_system: true,
                        permission_ids: Vec::new(),
                    },
                )
            })
            .collect();
        let principals = principals
            .iter()
            .map(|(user_id, role)| ((*user_id).to_owned(), Some((*role).to_owned())))
            .collect();

        Self {
            catalog,
            roles: Mutex::new(roles),
            principals: Mutex::new(principals),
            events: Mutex::new(Vec::new()),
            fail_role_updates: AtomicBool::new(false),
            fail_description_writes: AtomicBool::new(false),
        }
    }

    fn resolve(&self, permission_ids: &[PermissionId]) -> AppResult<Vec<Permission>> {
        permission_ids
            .iter()
            .map(|permission_id| {
                self.catalog
                    .iter()
                    .find(|value| value.id() == *permission_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::Validation(format!("unknown permission id '{permission_id}'"))
                    })
            })
            .collect()
    }

    fn definition(&self, name: &str, stored: &StoredRole) -> RoleDefinition {
        RoleDefinition {
            name: name.to_owned(),
            description: stored.description.clone(),
            is_system: stored.is_system,
            permissions: self.resolve(&stored.permission_ids).unwrap_or_default(),
            created_at: "2026-01-01T00:00:00Z".to_owned(),
            updated_at: "2026-01-01T00:00:00Z".to_owned(),
        }
    }
}

#[async_trait]
impl PermissionCatalogRepository for FakeRbacStore {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.catalog.clone())
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let roles = self.roles.lock().await;
        Ok(roles
            .iter()
            .map(|(name, stored)| self.definition(name, stored))
            .collect())
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let roles = self.roles.lock().await;
        Ok(roles.get(name).map(|stored| self.definition(name, stored)))
    }

    async fn create_role(&self, draft: RoleDraft) -> AppResult<RoleDefinition> {
        self.resolve(&draft.permission_ids)?;
        let mut roles = self.roles.lock().await;
        if roles.contains_key(draft.name.as_str()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                draft.name
            )));
        }
        let stored = StoredRole {
            description: draft.description,
            is_system: false,
            permission_ids: draft.permission_ids,
        };
        roles.insert(draft.name.as_str().to_owned(), stored.clone());
        Ok(self.definition(draft.name.as_str(), &stored))
    }

    async fn update_role(&self, update: RoleUpdate) -> AppResult<()> {
        if self.fail_role_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("role store unavailable".to_owned()));
        }
        let mut roles = self.roles.lock().await;
        let Some(stored) = roles.get_mut(update.name.as_str()) else {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                update.name
            )));
        };
        self.resolve(&update.permission_ids)?;
        stored.permission_ids = update.permission_ids;
        if let Some(description) = update.description {
            stored.description = description;
        }
        Ok(())
    }

    async fn update_role_description(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<()> {
        if self.fail_description_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("description write failed".to_owned()));
        }
        let mut roles = self.roles.lock().await;
        let Some(stored) = roles.get_mut(name) else {
            return Err(AppError::NotFound(format!("role '{name}' was not found")));
        };
        stored.description = description.map(ToOwned::to_owned);
        Ok(())
    }

    async fn delete_role(&self, name: &str) -> AppResult<()> {
        self.roles
            .lock()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' was not found")))
    }
}

#[async_trait]
impl AuthorizationRepository for FakeRbacStore {
    async fn find_principal_role(&self, user_id: &str) -> AppResult<Option<String>> {
        Ok(self.principals.lock().await.get(user_id).cloned().flatten())
    }

    async fn list_role_permissions(&self, role_name: &str) -> AppResult<Vec<Permission>> {
        let roles = self.roles.lock().await;
        Ok(roles
            .get(role_name)
            .map(|stored| self.resolve(&stored.permission_ids).unwrap_or_default())
            .unwrap_or_default())
    }
}

#[async_trait]
impl PrincipalRepository for FakeRbacStore {
    async fn find_principal(&self, user_id: &str) -> AppResult<Option<PrincipalRecord>> {
        Ok(self
            .principals
            .lock()
            .await
            .get(user_id)
            .map(|role| PrincipalRecord {
                user_id: user_id.to_owned(),
                email: None,
                display_name: user_id.to_owned(),
                role: role.clone(),
            }))
    }

    async fn set_principal_role(&self, user_id: &str, role_name: &str) -> AppResult<()> {
        if !self.roles.lock().await.contains_key(role_name) {
            return Err(AppError::NotFound(format!("role '{role_name}' was not found")));
        }
        let mut principals = self.principals.lock().await;
        let Some(role) = principals.get_mut(user_id) else {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        };
        *role = Some(role_name.to_owned());
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for FakeRbacStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

fn catalog() -> Vec<Permission> {
    [
        ("content_moderation", "exerciseSetup:create"),
        ("content_moderation", "exerciseSetup:delete"),
        ("user_management", "users:read"),
    ]
    .into_iter()
    .map(|(group, value)| {
        PermissionKey::parse(value)
            .and_then(|key| Permission::new(PermissionId::new(), key, value, group))
            .unwrap_or_else(|error| panic!("invalid test permission: {error}"))
    })
    .collect()
}

fn actor(user_id: &str) -> UserIdentity {
    UserIdentity::new(user_id, user_id, None, None)
}

fn service() -> (SecurityAdminService, AuthorizationService, Arc<FakeRbacStore>) {
    let store = Arc::new(FakeRbacStore::new(
        catalog(),
        &[
            ("root", "super"),
            ("ops", "admin"),
            ("coach", "user"),
            ("member", "user"),
        ],
    ));
    let authorization_service = AuthorizationService::new(store.clone());
    let service = SecurityAdminService::new(
        authorization_service.clone(),
        PermissionCatalogService::new(store.clone()),
        RoleService::new(store.clone()),
        store.clone(),
        store.clone(),
    );
    (service, authorization_service, store)
}

fn create_input(store: &FakeRbacStore, name: &str, count: usize) -> AppResult<CreateRoleInput> {
    Ok(CreateRoleInput {
        name: name.to_owned(),
        description: None,
        permission_ids: store.catalog.iter().take(count).map(Permission::id).collect(),
    })
}

#[tokio::test]
async fn catalog_listing_requires_super_tier() {
    let (service, _, _) = service();

    let as_admin = service.list_permission_catalog(&actor("ops")).await;
    let as_super = service.list_permission_catalog(&actor("root")).await;

    assert!(matches!(as_admin, Err(AppError::Forbidden(_))));
    let grouped = as_super.unwrap_or_default();
    assert_eq!(
        grouped.keys().cloned().collect::<Vec<_>>(),
        vec!["content_moderation".to_owned(), "user_management".to_owned()]
    );
}

#[tokio::test]
async fn create_role_requires_super_tier() {
    let (service, _, store) = service();

    let result = service
        .create_role(&actor("ops"), create_input(&store, "trainer", 1))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(store.events.lock().await.is_empty());
}

#[tokio::test]
async fn unauthorized_caller_never_sees_payload_errors() {
    let (service, _, _) = service();

    let result = service
        .create_role(
            &actor("coach"),
            Err(AppError::Validation("permissionIds must be an array".to_owned())),
        )
        .await;
    let update = service
        .update_role(
            &actor("coach"),
            "trainer",
            Err(AppError::Validation("permissionIds must be an array".to_owned())),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(matches!(update, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn authorized_caller_sees_payload_errors() {
    let (service, _, _) = service();

    let result = service
        .create_role(
            &actor("root"),
            Err(AppError::Validation("permissionIds must be an array".to_owned())),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_then_check_grants_assigned_principal() {
    let (service, authorization_service, store) = service();

    let created = service
        .create_role(&actor("root"), create_input(&store, "trainer", 1))
        .await;
    assert!(created.is_ok());

    let assigned = service
        .assign_principal_role(&actor("ops"), "member", Ok("trainer".to_owned()))
        .await;
    assert!(assigned.is_ok());

    assert_eq!(
        authorization_service
            .has_all("member", &["exerciseSetup:create"])
            .await
            .ok(),
        Some(true)
    );
    assert_eq!(
        authorization_service
            .has_all("member", &["exerciseSetup:delete"])
            .await
            .ok(),
        Some(false)
    );

    let events = store.events.lock().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, AuditAction::SecurityRoleCreated);
    assert_eq!(events[1].action, AuditAction::SecurityRoleAssigned);
}

#[tokio::test]
async fn update_role_replaces_grants_and_description() {
    let (service, _, store) = service();
    assert!(
        service
            .create_role(&actor("root"), create_input(&store, "editor", 1))
            .await
            .is_ok()
    );

    let result = service
        .update_role(
            &actor("ops"),
            "editor",
            Ok(UpdateRoleInput {
                permission_ids: store.catalog.iter().skip(1).map(Permission::id).collect(),
                description: Some("content editors".to_owned()),
            }),
        )
        .await;

    assert!(result.is_ok());
    let role = service.get_role(&actor("ops"), "editor").await;
    let Ok(role) = role else {
        panic!("role lookup failed");
    };
    assert_eq!(role.permissions.len(), 2);
    assert_eq!(role.description.as_deref(), Some("content editors"));
}

fn create_described(store: &FakeRbacStore, name: &str) -> AppResult<CreateRoleInput> {
    Ok(CreateRoleInput {
        name: name.to_owned(),
        description: Some("old".to_owned()),
        permission_ids: store.catalog.iter().take(1).map(Permission::id).collect(),
    })
}

#[tokio::test]
async fn update_role_writes_description_with_the_grants() {
    let (service, _, store) = service();
    assert!(
        service
            .create_role(&actor("root"), create_described(&store, "editor"))
            .await
            .is_ok()
    );
    store.fail_description_writes.store(true, Ordering::SeqCst);

    let result = service
        .update_role(
            &actor("ops"),
            "editor",
            Ok(UpdateRoleInput {
                permission_ids: store.catalog.iter().map(Permission::id).collect(),
                description: Some("new".to_owned()),
            }),
        )
        .await;

    assert!(result.is_ok());
    let role = service.get_role(&actor("ops"), "editor").await;
    let Ok(role) = role else {
        panic!("role lookup failed");
    };
    assert_eq!(role.permissions.len(), 3);
    assert_eq!(role.description.as_deref(), Some("new"));
}

#[tokio::test]
async fn failed_update_leaves_grants_description_and_audit_untouched() {
    let (service, _, store) = service();
    assert!(
        service
            .create_role(&actor("root"), create_described(&store, "editor"))
            .await
            .is_ok()
    );
    store.fail_role_updates.store(true, Ordering::SeqCst);

    let result = service
        .update_role(
            &actor("ops"),
            "editor",
            Ok(UpdateRoleInput {
                permission_ids: store.catalog.iter().map(Permission::id).collect(),
                description: Some("new".to_owned()),
            }),
        )
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    let role = service.get_role(&actor("ops"), "editor").await;
    let Ok(role) = role else {
        panic!("role lookup failed");
    };
    assert_eq!(role.permissions.len(), 1);
    assert_eq!(role.description.as_deref(), Some("old"));
    let events = store.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::SecurityRoleCreated);
}

#[tokio::test]
async fn update_role_ignores_description_for_system_roles() {
    let (service, _, store) = service();

    let result = service
        .update_role(
            &actor("root"),
            "user",
            Ok(UpdateRoleInput {
                permission_ids: store.catalog.iter().take(1).map(Permission::id).collect(),
                description: Some("renamed".to_owned()),
            }),
        )
        .await;

    assert!(result.is_ok());
    let role = service.get_role(&actor("root"), "user").await;
    let Ok(role) = role else {
        panic!("role lookup failed");
    };
    assert_eq!(role.permissions.len(), 1);
    assert_eq!(role.description, None);
}

#[tokio::test]
async fn admin_role_cannot_be_edited_even_by_super() {
    let (service, _, store) = service();

    let result = service
        .update_role(
            &actor("root"),
            "admin",
            Ok(UpdateRoleInput {
                permission_ids: Vec::new(),
                description: None,
            }),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(store.events.lock().await.is_empty());
}

#[tokio::test]
async fn delete_role_enforces_tier_and_protection() {
    let (service, _, store) = service();
    assert!(
        service
            .create_role(&actor("root"), create_input(&store, "editor", 0))
            .await
            .is_ok()
    );

    assert!(matches!(
        service.delete_role(&actor("coach"), "editor").await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        service.delete_role(&actor("ops"), "user").await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        service.delete_role(&actor("ops"), "missing").await,
        Err(AppError::NotFound(_))
    ));
    assert!(service.delete_role(&actor("ops"), "editor").await.is_ok());
}

#[tokio::test]
async fn tier_checks_use_live_role_not_cached_session_role() {
    let (service, _, _) = service();
    let stale = UserIdentity::new("coach", "coach", None, Some("super".to_owned()));

    let result = service.list_roles(&stale).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn granting_super_requires_super_tier() {
    let (service, _, _) = service();

    let by_admin = service
        .assign_principal_role(&actor("ops"), "member", Ok("super".to_owned()))
        .await;
    let by_super = service
        .assign_principal_role(&actor("root"), "member", Ok("super".to_owned()))
        .await;

    assert!(matches!(by_admin, Err(AppError::Forbidden(_))));
    assert!(by_super.is_ok());
}

#[tokio::test]
async fn assigning_unknown_role_or_user_is_not_found() {
    let (service, _, _) = service();

    let unknown_role = service
        .assign_principal_role(&actor("ops"), "member", Ok("ghost".to_owned()))
        .await;
    let unknown_user = service
        .assign_principal_role(&actor("ops"), "nobody", Ok("user".to_owned()))
        .await;

    assert!(matches!(unknown_role, Err(AppError::NotFound(_))));
    assert!(matches!(unknown_user, Err(AppError::NotFound(_))));
}
