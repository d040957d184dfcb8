use super::*;

pub async fn list_permission_catalog_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<BTreeMap<String, Vec<PermissionResponse>>>> {
    let grouped = state
        .security_admin_service
        .list_permission_catalog(&user)
        .await?
        .into_iter()
        .map(|(group, permissions)| {
            (
                group,
                permissions.iter().map(PermissionResponse::from).collect(),
            )
        })
        .collect();

    Ok(Json(grouped))
}
