use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use forgefit_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::BootstrapRequest;
use crate::error::{ApiResult, json_payload};
use crate::state::AppState;

use super::SESSION_USER_KEY;

/// Establishes a session for an existing principal using the shared bootstrap token.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<BootstrapRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let payload = json_payload(payload)?;
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let principal = state
        .principal_repository
        .find_principal(payload.user_id.as_str())
        .await?
        .ok_or_else(|| AppError::Unauthorized("unknown user".to_owned()))?;

    let identity = UserIdentity::new(
        principal.user_id,
        principal.display_name,
        principal.email,
        principal.role,
    );

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    tracing::info!(user_id = identity.user_id(), "bootstrap session established");
    Ok(StatusCode::NO_CONTENT)
}
