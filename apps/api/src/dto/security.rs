use forgefit_application::{CreateRoleInput, RoleDefinition, UpdateRoleInput};
use forgefit_core::AppResult;
use forgefit_domain::{Permission, PermissionId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a catalog permission.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub id: String,
    pub resource: String,
    pub action: String,
    pub display_name: String,
    pub group: String,
}

/// API representation of a role with resolved grants.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub name: String,
    pub description: Option<String>,
    pub is_system: bool,
    pub permissions: Vec<PermissionResponse>,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub permission_ids: Vec<String>,
}

/// Incoming payload for role edits. Grants are replaced wholesale.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub permission_ids: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming payload for changing a user's role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-user-role-request.ts"
)]
pub struct AssignUserRoleRequest {
    pub role: String,
}

impl From<&Permission> for PermissionResponse {
    fn from(value: &Permission) -> Self {
        Self {
            id: value.id().to_string(),
            resource: value.key().resource().to_owned(),
            action: value.key().action().to_owned(),
            display_name: value.display_name().to_owned(),
            group: value.group().to_owned(),
        }
    }
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            name: value.name,
            description: value.description,
            is_system: value.is_system,
            permissions: value
                .permissions
                .iter()
                .map(PermissionResponse::from)
                .collect(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl CreateRoleRequest {
    /// Converts the transport payload, rejecting malformed permission ids.
    pub fn into_input(self) -> AppResult<CreateRoleInput> {
        Ok(CreateRoleInput {
            name: self.name,
            description: self.description,
            permission_ids: parse_permission_ids(&self.permission_ids)?,
        })
    }
}

impl UpdateRoleRequest {
    /// Converts the transport payload, rejecting malformed permission ids.
    pub fn into_input(self) -> AppResult<UpdateRoleInput> {
        Ok(UpdateRoleInput {
            permission_ids: parse_permission_ids(&self.permission_ids)?,
            description: self.description,
        })
    }
}

fn parse_permission_ids(values: &[String]) -> AppResult<Vec<PermissionId>> {
    values
        .iter()
        .map(|value| PermissionId::parse(value.as_str()))
        .collect()
}
