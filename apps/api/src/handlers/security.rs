use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use forgefit_core::UserIdentity;

use crate::dto::{
    AssignUserRoleRequest, CreateRoleRequest, PermissionResponse, RoleResponse, SuccessResponse,
    UpdateRoleRequest,
};
use crate::error::{ApiResult, json_payload};
use crate::state::AppState;

mod catalog;
mod principals;
mod roles;

pub use catalog::list_permission_catalog_handler;
pub use principals::assign_user_role_handler;
pub use roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_roles_handler,
    update_role_handler,
};
