use std::collections::BTreeMap;

use forgefit_core::{AppResult, UserIdentity};
use forgefit_domain::{AuditAction, Permission, RoleTier};

use crate::{AuditEvent, CreateRoleInput, RoleDefinition, UpdateRoleInput};

use super::SecurityAdminService;

impl SecurityAdminService {
    /// Returns the grouped permission catalog. Restricted to the super tier.
    pub async fn list_permission_catalog(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<BTreeMap<String, Vec<Permission>>> {
        self.require_tier(actor, RoleTier::Super).await?;
        self.catalog_service.list_grouped().await
    }

    /// Returns all roles with resolved grants.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<RoleDefinition>> {
        self.require_tier(actor, RoleTier::Admin).await?;
        self.role_service.list_all().await
    }

    /// Returns one role with resolved grants.
    pub async fn get_role(&self, actor: &UserIdentity, name: &str) -> AppResult<RoleDefinition> {
        self.require_tier(actor, RoleTier::Admin).await?;
        self.role_service.get_by_name(name).await
    }

    /// Creates a custom role and emits an audit event. Restricted to the super tier.
    ///
    /// The payload is only inspected once the caller is authorized, so an
    /// unauthorized caller never learns why a payload would have been rejected.
    pub async fn create_role(
        &self,
        actor: &UserIdentity,
        input: AppResult<CreateRoleInput>,
    ) -> AppResult<RoleDefinition> {
        self.require_tier(actor, RoleTier::Super).await?;

        let role = self.role_service.create(input?).await?;

        self.append_audit_event(AuditEvent {
            subject: actor.user_id().to_owned(),
            action: AuditAction::SecurityRoleCreated,
            resource_type: "rbac_role".to_owned(),
            resource_id: role.name.clone(),
            detail: Some(format!(
                "created role '{}' with {} permissions",
                role.name,
                role.permissions.len()
            )),
        })
        .await?;

        Ok(role)
    }

    /// Replaces a role's grants and, for custom roles, its description.
    ///
    /// A description sent for a system role is ignored.
    pub async fn update_role(
        &self,
        actor: &UserIdentity,
        name: &str,
        input: AppResult<UpdateRoleInput>,
    ) -> AppResult<()> {
        self.require_tier(actor, RoleTier::Admin).await?;
        let input = input?;

        let permission_count = input.permission_ids.len();
        self.role_service
            .update(name, input.permission_ids, input.description)
            .await?;

        self.append_audit_event(AuditEvent {
            subject: actor.user_id().to_owned(),
            action: AuditAction::SecurityRoleUpdated,
            resource_type: "rbac_role".to_owned(),
            resource_id: name.trim().to_owned(),
            detail: Some(format!(
                "replaced grants of role '{}' with {} permissions",
                name.trim(),
                permission_count
            )),
        })
        .await
    }

    /// Deletes a custom role and emits an audit event.
    pub async fn delete_role(&self, actor: &UserIdentity, name: &str) -> AppResult<()> {
        self.require_tier(actor, RoleTier::Admin).await?;

        self.role_service.delete(name).await?;

        self.append_audit_event(AuditEvent {
            subject: actor.user_id().to_owned(),
            action: AuditAction::SecurityRoleDeleted,
            resource_type: "rbac_role".to_owned(),
            resource_id: name.trim().to_owned(),
            detail: Some(format!("deleted role '{}'", name.trim())),
        })
        .await
    }
}
