use forgefit_core::{AppError, AppResult};
use forgefit_domain::RoleTier;

use super::AuthorizationService;

impl AuthorizationService {
    /// Ensures the principal's live role satisfies a privilege tier.
    pub async fn require_tier(&self, user_id: &str, tier: RoleTier) -> AppResult<()> {
        let role_name = self.repository.find_principal_role(user_id).await?;

        match role_name {
            Some(role_name) if tier.is_satisfied_by(&role_name) => Ok(()),
            _ => Err(AppError::Forbidden(format!(
                "principal '{user_id}' requires the '{}' tier",
                tier.as_str()
            ))),
        }
    }

    /// Returns whether the principal's live role satisfies a privilege tier.
    pub async fn has_tier(&self, user_id: &str, tier: RoleTier) -> AppResult<bool> {
        Ok(self
            .repository
            .find_principal_role(user_id)
            .await?
            .is_some_and(|role_name| tier.is_satisfied_by(&role_name)))
    }
}
