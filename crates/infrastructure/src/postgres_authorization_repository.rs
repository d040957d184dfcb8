use async_trait::async_trait;
use sqlx::PgPool;

use forgefit_application::AuthorizationRepository;
use forgefit_core::{AppError, AppResult};
use forgefit_domain::Permission;

use crate::postgres_permission_catalog_repository::PermissionRow;

/// PostgreSQL-backed repository for principal grant lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn find_principal_role(&self, user_id: &str) -> AppResult<Option<String>> {
        let role = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve role of user '{user_id}': {error}"))
        })?;

        Ok(role.flatten())
    }

    async fn list_role_permissions(&self, role_name: &str) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT
                permissions.id,
                permissions.resource,
                permissions.action,
                permissions.display_name,
                permissions.permission_group
            FROM role_permissions
            INNER JOIN permissions
                ON permissions.id = role_permissions.permission_id
            WHERE role_permissions.role_name = $1
            "#,
        )
        .bind(role_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load permissions of role '{role_name}': {error}"
            ))
        })?;

        rows.into_iter().map(PermissionRow::into_permission).collect()
    }
}
