use forgefit_core::{AppError, AppResult, UserIdentity};
use forgefit_domain::{AuditAction, RoleTier, SUPER_ROLE};

use crate::AuditEvent;

use super::SecurityAdminService;

impl SecurityAdminService {
    /// Assigns the single role of a principal and emits an audit event.
    ///
    /// Granting the super role additionally requires the super tier.
    pub async fn assign_principal_role(
        &self,
        actor: &UserIdentity,
        user_id: &str,
        role_name: AppResult<String>,
    ) -> AppResult<()> {
        self.require_tier(actor, RoleTier::Admin).await?;

        let role = self.role_service.get_by_name(role_name?.as_str()).await?;
        if role.name == SUPER_ROLE {
            self.require_tier(actor, RoleTier::Super).await?;
        }

        let principal = self
            .principal_repository
            .find_principal(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;

        self.principal_repository
            .set_principal_role(principal.user_id.as_str(), role.name.as_str())
            .await?;

        self.append_audit_event(AuditEvent {
            subject: actor.user_id().to_owned(),
            action: AuditAction::SecurityRoleAssigned,
            resource_type: "rbac_principal_role".to_owned(),
            resource_id: format!("{}:{}", principal.user_id, role.name),
            detail: Some(format!(
                "changed role of '{}' from '{}' to '{}'",
                principal.user_id,
                principal.role.as_deref().unwrap_or("none"),
                role.name
            )),
        })
        .await
    }
}
