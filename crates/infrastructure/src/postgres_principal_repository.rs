use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use forgefit_application::{PrincipalRecord, PrincipalRepository};
use forgefit_core::{AppError, AppResult};

/// PostgreSQL-backed repository over the user table owned by user management.
#[derive(Clone)]
pub struct PostgresPrincipalRepository {
    pool: PgPool,
}

impl PostgresPrincipalRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PrincipalRow {
    id: String,
    email: Option<String>,
    display_name: String,
    role: Option<String>,
}

#[async_trait]
impl PrincipalRepository for PostgresPrincipalRepository {
    async fn find_principal(&self, user_id: &str) -> AppResult<Option<PrincipalRecord>> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, email, display_name, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user '{user_id}': {error}")))?;

        Ok(row.map(|row| PrincipalRecord {
            user_id: row.id,
            email: row.email,
            display_name: row.display_name,
            role: row.role,
        }))
    }

    async fn set_principal_role(&self, user_id: &str, role_name: &str) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let role_exists = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(role_name)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?;

        if role_exists == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_name}' was not found"
            )));
        }

        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET role = $2
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(role_name)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to assign role: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        tracing::info!(user_id, role = role_name, "assigned principal role");
        Ok(())
    }
}
