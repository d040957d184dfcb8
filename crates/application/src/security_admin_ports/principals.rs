/// Principal projection used for session establishment and role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalRecord {
    /// Stable principal identifier.
    pub user_id: String,
    /// Account email, when known.
    pub email: Option<String>,
    /// Display name shown in the admin dashboard.
    pub display_name: String,
    /// Name of the single assigned role, if any.
    pub role: Option<String>,
}
