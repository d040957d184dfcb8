use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, patch, post};
use forgefit_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


pub fn build_router<Store>(
    app_state: AppState,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let cors_layer = cors::build_cors_layer(app_state.frontend_url.as_str())?;

    let protected_routes = Router::new()
        .route(
            "/admin/permissions",
            get(handlers::security::list_permission_catalog_handler),
        )
        .route(
            "/admin/roles",
            get(handlers::security::list_roles_handler)
                .post(handlers::security::create_role_handler),
        )
        .route(
            "/admin/roles/{name}",
            get(handlers::security::get_role_handler)
                .patch(handlers::security::update_role_handler)
                .delete(handlers::security::delete_role_handler),
        )
        .route(
            "/users/{user_id}/role",
            patch(handlers::security::assign_user_role_handler),
        )
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    let identity_aware_routes = Router::new()
        .route(
            "/auth/permissions",
            get(auth::effective_permissions_handler),
        )
        .route_layer(from_fn(middleware::load_identity));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(identity_aware_routes)
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::redact_internal_errors,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}
