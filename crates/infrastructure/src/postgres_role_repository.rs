use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use forgefit_application::{RoleDefinition, RoleDraft, RoleRepository, RoleUpdate};
use forgefit_core::{AppError, AppResult};
use forgefit_domain::{PermissionId, sort_catalog};

use crate::postgres_permission_catalog_repository::PermissionRow;

mod roles;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed role store.
///
/// Grant writes run inside a single transaction; a failure at any step rolls
/// the whole write back.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_name: String,
    description: Option<String>,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    permission_id: Option<uuid::Uuid>,
    resource: Option<String>,
    action: Option<String>,
    display_name: Option<String>,
    permission_group: Option<String>,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        self.find_role_impl(name).await
    }

    async fn create_role(&self, draft: RoleDraft) -> AppResult<RoleDefinition> {
        self.create_role_impl(draft).await
    }

    async fn update_role(&self, update: RoleUpdate) -> AppResult<()> {
        self.update_role_impl(update).await
    }

    async fn update_role_description(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<()> {
        self.update_role_description_impl(name, description).await
    }

    async fn delete_role(&self, name: &str) -> AppResult<()> {
        self.delete_role_impl(name).await
    }
}

async fn load_roles(
    connection: &mut PgConnection,
    name: Option<&str>,
) -> AppResult<Vec<RoleDefinition>> {
    let rows = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT
            roles.name AS role_name,
            roles.description,
            roles.is_system,
            roles.created_at,
            roles.updated_at,
            permissions.id AS permission_id,
            permissions.resource,
            permissions.action,
            permissions.display_name,
            permissions.permission_group
        FROM roles
        LEFT JOIN role_permissions
            ON role_permissions.role_name = roles.name
        LEFT JOIN permissions
            ON permissions.id = role_permissions.permission_id
        WHERE $1::TEXT IS NULL OR roles.name = $1
        ORDER BY roles.name
        "#,
    )
    .bind(name)
    .fetch_all(connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load roles: {error}")))?;

    aggregate_roles(rows)
}

async fn ensure_known_permissions(
    connection: &mut PgConnection,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    let requested: Vec<uuid::Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();
    let unknown = sqlx::query_scalar::<_, uuid::Uuid>(
        r#"
        SELECT requested.id
        FROM UNNEST($1::UUID[]) AS requested(id)
        WHERE NOT EXISTS (
            SELECT 1 FROM permissions WHERE permissions.id = requested.id
        )
        "#,
    )
    .bind(requested)
    .fetch_all(connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to verify permission ids: {error}")))?;

    match unknown.first() {
        Some(permission_id) => Err(AppError::Validation(format!(
            "unknown permission id '{permission_id}'"
        ))),
        None => Ok(()),
    }
}

async fn insert_grants(
    connection: &mut PgConnection,
    role_name: &str,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    let permission_ids: Vec<uuid::Uuid> =
        permission_ids.iter().map(PermissionId::as_uuid).collect();

    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_name, permission_id)
        SELECT $1, granted.id
        FROM UNNEST($2::UUID[]) AS granted(id)
        ON CONFLICT (role_name, permission_id) DO NOTHING
        "#,
    )
    .bind(role_name)
    .bind(permission_ids)
    .execute(connection)
    .await
    .map_err(map_grant_error)?;

    Ok(())
}

/// Clears the grants of a role and inserts the replacement set on the same
/// connection. Callers own the surrounding transaction.
async fn replace_grants(
    connection: &mut PgConnection,
    role_name: &str,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    sqlx::query(
        r#"
        DELETE FROM role_permissions
        WHERE role_name = $1
        "#,
    )
    .bind(role_name)
    .execute(&mut *connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to clear role grants: {error}")))?;

    insert_grants(connection, role_name, permission_ids).await
}

fn aggregate_roles(rows: Vec<RoleRow>) -> AppResult<Vec<RoleDefinition>> {
    let mut roles: Vec<RoleDefinition> = Vec::new();

    for row in rows {
        let permission = match (
            row.permission_id,
            row.resource,
            row.action,
            row.display_name,
            row.permission_group,
        ) {
            (Some(id), Some(resource), Some(action), Some(display_name), Some(permission_group)) => {
                Some(
                    PermissionRow {
                        id,
                        resource,
                        action,
                        display_name,
                        permission_group,
                    }
                    .into_permission()?,
                )
            }
            _ => None,
        };

        let is_same_role = roles
            .last()
            .is_some_and(|role| role.name == row.role_name);
        if !is_same_role {
            roles.push(RoleDefinition {
                name: row.role_name,
                description: row.description,
                is_system: row.is_system,
                permissions: Vec::new(),
                created_at: row.created_at.to_rfc3339(),
                updated_at: row.updated_at.to_rfc3339(),
            });
        }

        if let (Some(permission), Some(role)) = (permission, roles.last_mut()) {
            role.permissions.push(permission);
        }
    }

    for role in &mut roles {
        sort_catalog(&mut role.permissions);
    }

    Ok(roles)
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to create role '{role_name}': {error}"))
}

fn map_grant_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::Validation("unknown permission id in grant set".to_owned());
    }

    AppError::Internal(format!("failed to persist role grants: {error}"))
}
