use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use forgefit_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::{
    EffectivePermissionResponse, EffectivePermissionsResponse, UserIdentityResponse,
};
use crate::error::ApiResult;
use crate::middleware::OptionalIdentity;
use crate::state::AppState;

use super::SESSION_USER_KEY;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let user_id = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .map(|identity| identity.user_id().to_owned());

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(user_id) = user_id {
        tracing::info!(user_id = user_id.as_str(), "session ended");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the session identity. The role is the copy taken at login.
pub async fn me_handler(
    Extension(identity): Extension<UserIdentity>,
) -> Json<UserIdentityResponse> {
    Json(UserIdentityResponse::from(identity))
}

/// Lists the caller's effective permissions. Anonymous callers get an empty list.
pub async fn effective_permissions_handler(
    State(state): State<AppState>,
    Extension(OptionalIdentity(identity)): Extension<OptionalIdentity>,
) -> ApiResult<Json<EffectivePermissionsResponse>> {
    let Some(identity) = identity else {
        return Ok(Json(EffectivePermissionsResponse::default()));
    };

    let permissions = state
        .authorization_service
        .resolve(identity.user_id())
        .await?
        .into_iter()
        .map(EffectivePermissionResponse::from)
        .collect();

    Ok(Json(EffectivePermissionsResponse { permissions }))
}
