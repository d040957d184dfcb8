//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod permission;
mod role;
mod security;

pub use permission::{Permission, PermissionId, PermissionKey, PermissionSet, sort_catalog};
pub use role::{
    ADMIN_ROLE, ROLE_NAME_MAX_LENGTH, RoleName, SUPER_ROLE, SYSTEM_ROLES, USER_ROLE,
    is_delete_protected, is_edit_protected,
};
pub use security::{AuditAction, RoleTier};
