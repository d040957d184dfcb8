use serde::{Deserialize, Serialize};

/// Principal information persisted in the authenticated session.
///
/// The role name is a denormalised copy taken at login time. It may be stale
/// and is only used for display; authorization always re-reads the live role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: String,
    display_name: String,
    email: Option<String>,
    role: Option<String>,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        role: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            email,
            role,
        }
    }

    /// Returns the stable principal identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the role name cached in the session at login time.
    #[must_use]
    pub fn cached_role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}
