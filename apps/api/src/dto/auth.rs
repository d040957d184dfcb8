use forgefit_core::UserIdentity;
use forgefit_domain::Permission;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for bootstrap session establishment.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub user_id: String,
    pub token: String,
}

/// Identity of the signed-in principal as captured at login.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            role: identity.cached_role().map(ToOwned::to_owned),
        }
    }
}

/// One permission held by the current principal.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-permission-response.ts"
)]
pub struct EffectivePermissionResponse {
    pub resource: String,
    pub action: String,
    pub display_name: String,
}

/// Effective permissions of the current principal, used for UI gating.
#[derive(Debug, Default, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-permissions-response.ts"
)]
pub struct EffectivePermissionsResponse {
    pub permissions: Vec<EffectivePermissionResponse>,
}

impl From<Permission> for EffectivePermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            resource: value.key().resource().to_owned(),
            action: value.key().action().to_owned(),
            display_name: value.display_name().to_owned(),
        }
    }
}
