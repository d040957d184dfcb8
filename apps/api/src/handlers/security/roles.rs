use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&user)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(name): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .get_role(&user, name.as_str())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    payload: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let input = json_payload(payload).and_then(CreateRoleRequest::into_input);

    let role = state
        .security_admin_service
        .create_role(&user, input)
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(name): Path<String>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let input = json_payload(payload).and_then(UpdateRoleRequest::into_input);

    state
        .security_admin_service
        .update_role(&user, name.as_str(), input)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(name): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .security_admin_service
        .delete_role(&user, name.as_str())
        .await?;

    Ok(Json(SuccessResponse::ok()))
}
