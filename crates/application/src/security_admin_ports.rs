mod audit;
mod principals;
mod repositories;
mod roles;

pub use audit::{AuditEvent, AuditRepository};
pub use principals::PrincipalRecord;
pub use repositories::{PermissionCatalogRepository, PrincipalRepository, RoleRepository};
pub use roles::{CreateRoleInput, RoleDefinition, RoleDraft, RoleUpdate, UpdateRoleInput};
