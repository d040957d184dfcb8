//! Role naming rules and built-in role protections.

use std::fmt::{Display, Formatter};

use forgefit_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Name of the administrator role. Never editable, never deletable.
pub const ADMIN_ROLE: &str = "admin";
/// Name of the highest privilege tier.
pub const SUPER_ROLE: &str = "super";
/// Name of the default role for ordinary accounts. Never deletable.
pub const USER_ROLE: &str = "user";

/// Roles seeded at initialization.
pub const SYSTEM_ROLES: &[&str] = &[ADMIN_ROLE, SUPER_ROLE, USER_ROLE];

/// Maximum accepted role name length.
pub const ROLE_NAME_MAX_LENGTH: usize = 64;

/// Validated role name. Role names are the identity principals reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a trimmed, non-empty role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("role name must not be empty".to_owned()));
        }
        if trimmed.chars().count() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must be at most {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(AppError::Validation(
                "role name must not contain control characters".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether the role may never have its permissions replaced.
    #[must_use]
    pub fn is_edit_protected(&self) -> bool {
        is_edit_protected(self.as_str())
    }

    /// Returns whether the role may never be deleted, regardless of flags.
    #[must_use]
    pub fn is_delete_protected(&self) -> bool {
        is_delete_protected(self.as_str())
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Hard-coded edit protection, independent of the `is_system` flag.
#[must_use]
pub fn is_edit_protected(name: &str) -> bool {
    name == ADMIN_ROLE
}

/// Hard-coded delete protection, independent of the `is_system` flag.
#[must_use]
pub fn is_delete_protected(name: &str) -> bool {
    name == ADMIN_ROLE || name == USER_ROLE
}
