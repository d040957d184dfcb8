use serde::Serialize;
use ts_rs::TS;

mod auth;
mod security;

pub use auth::{
    BootstrapRequest, EffectivePermissionResponse, EffectivePermissionsResponse,
    UserIdentityResponse,
};
pub use security::{
    AssignUserRoleRequest, CreateRoleRequest, PermissionResponse, RoleResponse, UpdateRoleRequest,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Acknowledgement payload for mutations without a resource body.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/success-response.ts"
)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
