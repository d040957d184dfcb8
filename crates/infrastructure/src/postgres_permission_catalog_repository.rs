use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use forgefit_application::PermissionCatalogRepository;
use forgefit_core::{AppError, AppResult};
use forgefit_domain::{Permission, PermissionId, PermissionKey};

/// PostgreSQL-backed read-only permission catalog.
#[derive(Clone)]
pub struct PostgresPermissionCatalogRepository {
    pool: PgPool,
}

impl PostgresPermissionCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PermissionRow {
    pub(crate) id: uuid::Uuid,
    pub(crate) resource: String,
    pub(crate) action: String,
    pub(crate) display_name: String,
    pub(crate) permission_group: String,
}

impl PermissionRow {
    pub(crate) fn into_permission(self) -> AppResult<Permission> {
        let key = PermissionKey::new(self.resource, self.action).map_err(|error| {
            AppError::Internal(format!("failed to decode permission '{}': {error}", self.id))
        })?;

        Permission::new(
            PermissionId::from_uuid(self.id),
            key,
            self.display_name,
            self.permission_group,
        )
        .map_err(|error| {
            AppError::Internal(format!("failed to decode permission '{}': {error}", self.id))
        })
    }
}

#[async_trait]
impl PermissionCatalogRepository for PostgresPermissionCatalogRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource, action, display_name, permission_group
            FROM permissions
            ORDER BY permission_group, resource, action
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(PermissionRow::into_permission).collect()
    }
}
