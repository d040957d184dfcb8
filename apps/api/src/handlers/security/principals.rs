use super::*;

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    payload: Result<Json<AssignUserRoleRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let role_name = json_payload(payload).map(|request| request.role);

    state
        .security_admin_service
        .assign_principal_role(&user, user_id.as_str(), role_name)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}
