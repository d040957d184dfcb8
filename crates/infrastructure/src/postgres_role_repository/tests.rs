use forgefit_application::{
    AuthorizationRepository, PermissionCatalogRepository, RoleDraft, RoleRepository, RoleUpdate,
};
use forgefit_core::AppError;
use forgefit_domain::{Permission, PermissionId, RoleName};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::{PostgresRoleRepository, load_roles, replace_grants};
use crate::{PostgresAuthorizationRepository, PostgresPermissionCatalogRepository};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres role tests: {error}");
    }

    Some(pool)
}

async fn catalog(pool: &PgPool) -> Vec<Permission> {
    let listed = PostgresPermissionCatalogRepository::new(pool.clone())
        .list_permissions()
        .await;
    assert!(listed.is_ok());
    listed.unwrap_or_default()
}

fn unique_role_name(prefix: &str) -> RoleName {
    let name = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
    RoleName::new(name).unwrap_or_else(|_| unreachable!())
}

fn grants_only(name: &RoleName, permission_ids: Vec<PermissionId>) -> RoleUpdate {
    RoleUpdate {
        name: name.clone(),
        permission_ids,
        description: None,
    }
}

fn draft(name: RoleName, permission_ids: Vec<PermissionId>) -> RoleDraft {
    RoleDraft {
        name,
        description: Some("integration test role".to_owned()),
        permission_ids,
    }
}

#[tokio::test]
async fn seeded_catalog_and_system_roles_are_present() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let permissions = catalog(&pool).await;
    assert!(permissions.len() >= 18);

    let repository = PostgresRoleRepository::new(pool);
    let Ok(roles) = repository.list_roles().await else {
        panic!("failed to list roles");
    };
    for system_role in ["admin", "super", "user"] {
        assert!(
            roles
                .iter()
                .any(|role| role.name == system_role && role.is_system)
        );
    }
}

#[tokio::test]
async fn create_role_persists_grants_and_rejects_duplicates() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let permissions = catalog(&pool).await;
    let repository = PostgresRoleRepository::new(pool);
    let name = unique_role_name("coach");

    let created = repository
        .create_role(draft(
            name.clone(),
            permissions.iter().take(2).map(Permission::id).collect(),
        ))
        .await;
    let Ok(created) = created else {
        panic!("failed to create role");
    };
    assert_eq!(created.permissions.len(), 2);
    assert!(!created.is_system);

    let duplicate = repository.create_role(draft(name, Vec::new())).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_role_with_unknown_permission_leaves_no_role() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);
    let name = unique_role_name("ghost");

    let created = repository
        .create_role(draft(name.clone(), vec![PermissionId::new()]))
        .await;

    assert!(matches!(created, Err(AppError::Validation(_))));
    let found = repository.find_role(name.as_str()).await;
    assert!(matches!(found, Ok(None)));
}

#[tokio::test]
async fn replacing_permissions_is_idempotent() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let permissions = catalog(&pool).await;
    let repository = PostgresRoleRepository::new(pool);
    let name = unique_role_name("editor");
    assert!(
        repository
            .create_role(draft(name.clone(), Vec::new()))
            .await
            .is_ok()
    );

    let grants: Vec<PermissionId> = permissions.iter().take(3).map(Permission::id).collect();
    assert!(
        repository
            .update_role(grants_only(&name, grants.clone()))
            .await
            .is_ok()
    );
    let Ok(Some(first)) = repository.find_role(name.as_str()).await else {
        panic!("role missing after first replacement");
    };
    assert!(
        repository
            .update_role(grants_only(&name, grants.clone()))
            .await
            .is_ok()
    );
    let Ok(Some(second)) = repository.find_role(name.as_str()).await else {
        panic!("role missing after second replacement");
    };

    assert_eq!(first.permissions, second.permissions);
    assert_eq!(second.permissions.len(), 3);
}

#[tokio::test]
async fn update_role_commits_grants_and_description_together() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let permissions = catalog(&pool).await;
    let repository = PostgresRoleRepository::new(pool);
    let name = unique_role_name("described");
    assert!(
        repository
            .create_role(draft(
                name.clone(),
                permissions.iter().take(1).map(Permission::id).collect(),
            ))
            .await
            .is_ok()
    );

    let mut rejected = permissions.iter().take(3).map(Permission::id).collect::<Vec<_>>();
    rejected.push(PermissionId::new());
    let failed = repository
        .update_role(RoleUpdate {
            name: name.clone(),
            permission_ids: rejected,
            description: Some(Some("should not land".to_owned())),
        })
        .await;
    assert!(matches!(failed, Err(AppError::Validation(_))));
    let Ok(Some(unchanged)) = repository.find_role(name.as_str()).await else {
        panic!("role missing after rejected update");
    };
    assert_eq!(unchanged.permissions.len(), 1);
    assert_eq!(
        unchanged.description.as_deref(),
        Some("integration test role")
    );

    let updated = repository
        .update_role(RoleUpdate {
            name: name.clone(),
            permission_ids: permissions.iter().take(3).map(Permission::id).collect(),
            description: Some(Some("content editors".to_owned())),
        })
        .await;
    assert!(updated.is_ok());
    let Ok(Some(role)) = repository.find_role(name.as_str()).await else {
        panic!("role missing after update");
    };
    assert_eq!(role.permissions.len(), 3);
    assert_eq!(role.description.as_deref(), Some("content editors"));
}

#[tokio::test]
async fn grant_failure_after_clearing_rolls_back_to_previous_grants() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let permissions = catalog(&pool).await;
    let repository = PostgresRoleRepository::new(pool.clone());
    let name = unique_role_name("rollback");
    let original: Vec<Permission> = permissions.iter().take(2).cloned().collect();
    assert!(
        repository
            .create_role(draft(
                name.clone(),
                original.iter().map(Permission::id).collect(),
            ))
            .await
            .is_ok()
    );

    let mut transaction = pool
        .begin()
        .await
        .unwrap_or_else(|error| panic!("failed to begin transaction: {error}"));

    let cleared = replace_grants(&mut transaction, name.as_str(), &[permissions[5].id()]).await;
    assert!(cleared.is_ok());
    let midway = load_roles(&mut transaction, Some(name.as_str()))
        .await
        .unwrap_or_default();
    assert_eq!(
        midway.first().map(|role| role.permissions.clone()),
        Some(vec![permissions[5].clone()])
    );

    // An id that disappeared after validation trips the foreign key mid-write.
    let failed = replace_grants(
        &mut transaction,
        name.as_str(),
        &[permissions[6].id(), PermissionId::new()],
    )
    .await;
    assert!(matches!(failed, Err(AppError::Validation(_))));
    drop(transaction);

    let Ok(Some(role)) = repository.find_role(name.as_str()).await else {
        panic!("role missing after aborted replacement");
    };
    assert_eq!(role.permissions.len(), original.len());
    assert!(
        original
            .iter()
            .all(|permission| role.permissions.contains(permission))
    );
}

#[tokio::test]
async fn unknown_permission_id_is_rejected_before_any_write() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let permissions = catalog(&pool).await;
    let repository = PostgresRoleRepository::new(pool);
    let name = unique_role_name("atomic");
    let original: Vec<PermissionId> = permissions.iter().take(2).map(Permission::id).collect();
    assert!(
        repository
            .create_role(draft(name.clone(), original))
            .await
            .is_ok()
    );

    let mut replacement: Vec<PermissionId> =
        permissions.iter().skip(2).take(2).map(Permission::id).collect();
    replacement.insert(1, PermissionId::new());
    let result = repository
        .update_role(grants_only(&name, replacement))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let Ok(Some(role)) = repository.find_role(name.as_str()).await else {
        panic!("role missing after rejected replacement");
    };
    let expected: Vec<Permission> = permissions.iter().take(2).cloned().collect();
    assert_eq!(role.permissions.len(), 2);
    assert!(
        expected
            .iter()
            .all(|permission| role.permissions.contains(permission))
    );
}

#[tokio::test]
async fn deleting_role_cascades_grants_and_orphans_assignments() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let permissions = catalog(&pool).await;
    let repository = PostgresRoleRepository::new(pool.clone());
    let name = unique_role_name("temp");
    assert!(
        repository
            .create_role(draft(
                name.clone(),
                permissions.iter().take(1).map(Permission::id).collect(),
            ))
            .await
            .is_ok()
    );

    let user_id = format!("user-{}", uuid::Uuid::new_v4());
    let insert = sqlx::query(
        r#"
        INSERT INTO users (id, display_name, role)
        VALUES ($1, 'Temp User', $2)
        "#,
    )
    .bind(user_id.as_str())
    .bind(name.as_str())
    .execute(&pool)
    .await;
    assert!(insert.is_ok());

    assert!(repository.delete_role(name.as_str()).await.is_ok());

    let remaining = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM role_permissions WHERE role_name = $1",
    )
    .bind(name.as_str())
    .fetch_one(&pool)
    .await;
    assert_eq!(remaining.ok(), Some(0));

    let authorization = PostgresAuthorizationRepository::new(pool);
    assert_eq!(
        authorization
            .find_principal_role(user_id.as_str())
            .await
            .ok()
            .flatten()
            .as_deref(),
        Some(name.as_str())
    );
    let granted = authorization.list_role_permissions(name.as_str()).await;
    assert!(granted.is_ok_and(|permissions| permissions.is_empty()));

    let again = repository.delete_role(name.as_str()).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}
