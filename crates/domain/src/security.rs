use serde::{Deserialize, Serialize};

use crate::role::{ADMIN_ROLE, SUPER_ROLE};

/// Privilege tiers gating role administration.
///
/// `Super` sits strictly above `Admin`: a super principal satisfies both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    /// Manage existing roles and principal assignments.
    Admin,
    /// Create roles and read the raw permission catalog.
    Super,
}

impl RoleTier {
    /// Returns a stable label for this tier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ADMIN_ROLE,
            Self::Super => SUPER_ROLE,
        }
    }

    /// Returns whether a principal holding `role_name` satisfies this tier.
    #[must_use]
    pub fn is_satisfied_by(&self, role_name: &str) -> bool {
        match self {
            Self::Admin => role_name == ADMIN_ROLE || role_name == SUPER_ROLE,
            Self::Super => role_name == SUPER_ROLE,
        }
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a custom role is created.
    SecurityRoleCreated,
    /// Emitted when a role's grants or description change.
    SecurityRoleUpdated,
    /// Emitted when a custom role is deleted.
    SecurityRoleDeleted,
    /// Emitted when a principal's role changes.
    SecurityRoleAssigned,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityRoleCreated => "security.role.created",
            Self::SecurityRoleUpdated => "security.role.updated",
            Self::SecurityRoleDeleted => "security.role.deleted",
            Self::SecurityRoleAssigned => "security.role.assigned",
        }
    }
}
