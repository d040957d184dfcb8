use forgefit_core::{AppError, AppResult};
use forgefit_domain::{Permission, PermissionKey, PermissionSet, sort_catalog};

use super::AuthorizationService;

impl AuthorizationService {
    /// Returns whether the principal holds every requested permission.
    ///
    /// Principals without a role are denied without error.
    pub async fn has_all<S: AsRef<str> + Sync>(
        &self,
        user_id: &str,
        permissions: &[S],
    ) -> AppResult<bool> {
        let requested = PermissionKey::parse_all(permissions)?;

        Ok(self
            .granted_set(user_id)
            .await?
            .is_some_and(|granted| granted.contains_all(&requested)))
    }

    /// Returns whether the principal holds at least one requested permission.
    ///
    /// An empty request is always denied.
    pub async fn has_any<S: AsRef<str> + Sync>(
        &self,
        user_id: &str,
        permissions: &[S],
    ) -> AppResult<bool> {
        let requested = PermissionKey::parse_all(permissions)?;
        if requested.is_empty() {
            return Ok(false);
        }

        Ok(self
            .granted_set(user_id)
            .await?
            .is_some_and(|granted| granted.contains_any(&requested)))
    }

    /// Ensures the principal holds every requested permission.
    ///
    /// Fails with `PermissionDenied` carrying the unmet permissions.
    pub async fn require<S: AsRef<str> + Sync>(
        &self,
        user_id: &str,
        permissions: &[S],
    ) -> AppResult<()> {
        let requested = PermissionKey::parse_all(permissions)?;
        let granted = self.granted_set(user_id).await?;

        let missing = match granted {
            Some(granted) if granted.contains_all(&requested) => return Ok(()),
            Some(granted) => granted.missing(&requested),
            None => requested,
        };

        Err(AppError::PermissionDenied(
            missing.iter().map(ToString::to_string).collect(),
        ))
    }

    /// Returns the permissions granted to the principal's current role in catalog order.
    pub async fn resolve(&self, user_id: &str) -> AppResult<Vec<Permission>> {
        let Some(role_name) = self.repository.find_principal_role(user_id).await? else {
            return Ok(Vec::new());
        };

        let mut permissions = self.repository.list_role_permissions(&role_name).await?;
        sort_catalog(&mut permissions);
        permissions.dedup_by(|left, right| left.key() == right.key());
        Ok(permissions)
    }

    async fn granted_set(&self, user_id: &str) -> AppResult<Option<PermissionSet>> {
        let Some(role_name) = self.repository.find_principal_role(user_id).await? else {
            return Ok(None);
        };

        let permissions = self.repository.list_role_permissions(&role_name).await?;
        Ok(Some(permissions.iter().collect()))
    }
}
