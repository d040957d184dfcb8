use forgefit_application::{RoleDefinition, RoleDraft, RoleUpdate};
use forgefit_core::{AppError, AppResult};

use super::{
    PostgresRoleRepository, ensure_known_permissions, insert_grants, load_roles, map_role_conflict,
    replace_grants,
};

impl PostgresRoleRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<RoleDefinition>> {
        let mut connection = self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire connection: {error}"))
        })?;

        load_roles(&mut connection, None).await
    }

    pub(super) async fn find_role_impl(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let mut connection = self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire connection: {error}"))
        })?;

        Ok(load_roles(&mut connection, Some(name)).await?.pop())
    }

    pub(super) async fn create_role_impl(&self, draft: RoleDraft) -> AppResult<RoleDefinition> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO roles (name, description, is_system)
            VALUES ($1, $2, false)
            "#,
        )
        .bind(draft.name.as_str())
        .bind(draft.description.as_deref())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, draft.name.as_str()))?;

        ensure_known_permissions(&mut transaction, &draft.permission_ids).await?;
        insert_grants(&mut transaction, draft.name.as_str(), &draft.permission_ids).await?;

        let role = load_roles(&mut transaction, Some(draft.name.as_str()))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::Internal(format!("role '{}' vanished after insert", draft.name))
            })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        tracing::info!(
            role = role.name.as_str(),
            permissions = role.permissions.len(),
            "created role"
        );
        Ok(role)
    }

    pub(super) async fn update_role_impl(&self, update: RoleUpdate) -> AppResult<()> {
        let name = update.name.as_str();
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        // Row lock serializes concurrent edits of the same role.
        let locked = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM roles
            WHERE name = $1
            FOR UPDATE
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?;

        if locked.is_none() {
            return Err(AppError::NotFound(format!("role '{name}' was not found")));
        }

        ensure_known_permissions(&mut transaction, &update.permission_ids).await?;
        replace_grants(&mut transaction, name, &update.permission_ids).await?;

        sqlx::query(
            r#"
            UPDATE roles
            SET description = CASE WHEN $2::BOOLEAN THEN $3::TEXT ELSE description END,
                updated_at = now()
            WHERE name = $1
            "#,
        )
        .bind(name)
        .bind(update.description.is_some())
        .bind(update.description.clone().flatten())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update role: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        tracing::info!(
            role = name,
            permissions = update.permission_ids.len(),
            description_changed = update.description.is_some(),
            "updated role"
        );
        Ok(())
    }

    pub(super) async fn update_role_description_impl(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE roles
            SET description = $2, updated_at = now()
            WHERE name = $1
            "#,
        )
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update role description: {error}"))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{name}' was not found")));
        }

        tracing::debug!(role = name, "updated role description");
        Ok(())
    }

    pub(super) async fn delete_role_impl(&self, name: &str) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{name}' was not found")));
        }

        tracing::info!(role = name, "deleted role");
        Ok(())
    }
}
