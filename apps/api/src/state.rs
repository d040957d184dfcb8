use std::sync::Arc;

use forgefit_application::{
    AuditRepository, AuthorizationRepository, AuthorizationService, PermissionCatalogRepository,
    PermissionCatalogService, PrincipalRepository, RoleRepository, RoleService,
    SecurityAdminService,
};

use crate::api_config::AppEnvironment;

/// Port implementations the API is wired against.
#[derive(Clone)]
pub struct RbacRepositories {
    pub catalog: Arc<dyn PermissionCatalogRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub authorization: Arc<dyn AuthorizationRepository>,
    pub principals: Arc<dyn PrincipalRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub security_admin_service: SecurityAdminService,
    pub authorization_service: AuthorizationService,
    pub principal_repository: Arc<dyn PrincipalRepository>,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub app_env: AppEnvironment,
}

impl AppState {
    pub fn new(
        repositories: RbacRepositories,
        frontend_url: String,
        bootstrap_token: String,
        app_env: AppEnvironment,
    ) -> Self {
        let authorization_service = AuthorizationService::new(repositories.authorization);
        let security_admin_service = SecurityAdminService::new(
            authorization_service.clone(),
            PermissionCatalogService::new(repositories.catalog),
            RoleService::new(repositories.roles),
            repositories.principals.clone(),
            repositories.audit,
        );

        Self {
            security_admin_service,
            authorization_service,
            principal_repository: repositories.principals,
            frontend_url,
            bootstrap_token,
            app_env,
        }
    }
}
