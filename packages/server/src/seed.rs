use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::AdminCredentials;
use crate::entity::role::{ADMIN_ROLE, DEFAULT_ROLE};
use crate::entity::role_permission::{CATEGORY_MANAGE, SUB_CATEGORY_MANAGE};
use crate::entity::{role, role_permission, sub_category, user};
use crate::utils::hash;

/// Default roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &[ADMIN_ROLE, DEFAULT_ROLE];

/// Default role-permission mappings seeded on startup. Customers get none.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    (ADMIN_ROLE, CATEGORY_MANAGE),
    (ADMIN_ROLE, SUB_CATEGORY_MANAGE),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => roles_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => perms_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Create the configured admin account unless a user with that name exists.
pub async fn ensure_bootstrap_admin(
    db: &DatabaseConnection,
    credentials: &AdminCredentials,
) -> Result<(), anyhow::Error> {
    let username = credentials.username.trim();
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password = hash::hash_password(&credentials.password)
        .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;

    user::ActiveModel {
        username: Set(username.to_string()),
        password: Set(password),
        role: Set(ADMIN_ROLE.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username, "Created bootstrap admin account");
    Ok(())
}

/// Ensure required database indexes exist.
///
/// Schema sync only creates tables and columns, so lookup indexes are created here.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // SELECT ... FROM sub_category WHERE category_id = ? ORDER BY id
    let index = Index::create()
        .if_not_exists()
        .name("idx_sub_category_category")
        .table(sub_category::Entity)
        .col(sub_category::Column::CategoryId)
        .to_owned();

    let stmt = match db.get_database_backend() {
        DbBackend::Postgres => index.to_string(PostgresQueryBuilder),
        _ => index.to_string(SqliteQueryBuilder),
    };

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_sub_category_category exists"),
        Err(e) => tracing::warn!("Failed to create index idx_sub_category_category: {}", e),
    }

    Ok(())
}
