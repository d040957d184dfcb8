use std::sync::Arc;

use forgefit_core::{AppResult, UserIdentity};
use forgefit_domain::RoleTier;

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, PermissionCatalogService,
    PrincipalRepository, RoleService,
};

mod principals;
mod roles;

#[cfg(test)]
mod tests;

/// Application service for role administration workflows.
///
/// Every operation checks the caller's privilege tier against the live role
/// store before any payload is inspected or any state is touched.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    catalog_service: PermissionCatalogService,
    role_service: RoleService,
    principal_repository: Arc<dyn PrincipalRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        catalog_service: PermissionCatalogService,
        role_service: RoleService,
        principal_repository: Arc<dyn PrincipalRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            catalog_service,
            role_service,
            principal_repository,
            audit_repository,
        }
    }

    async fn require_tier(&self, actor: &UserIdentity, tier: RoleTier) -> AppResult<()> {
        self.authorization_service
            .require_tier(actor.user_id(), tier)
            .await
    }

    async fn append_audit_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_repository.append_event(event).await
    }
}
