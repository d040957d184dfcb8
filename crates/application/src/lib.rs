//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod permission_catalog_service;
mod role_service;
mod security_admin_ports;
mod security_admin_service;

pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use permission_catalog_service::PermissionCatalogService;
pub use role_service::RoleService;
pub use security_admin_ports::{
    AuditEvent, AuditRepository, CreateRoleInput, PermissionCatalogRepository, PrincipalRecord,
    PrincipalRepository, RoleDefinition, RoleDraft, RoleRepository, RoleUpdate, UpdateRoleInput,
};
pub use security_admin_service::SecurityAdminService;
