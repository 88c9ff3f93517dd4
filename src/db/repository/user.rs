//! User Repository

use super::{RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use crate::utils::time::{now_millis, snowflake_id};
use sqlx::SqliteExecutor;

const USER_SELECT: &str =
    "SELECT id, username, password_hash, role, is_active, created_at, updated_at FROM users";

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_by_username(
    ex: impl SqliteExecutor<'_>,
    username: &str,
) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn create(pool: &sqlx::SqlitePool, data: UserCreate) -> RepoResult<User> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, role, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&data.password_hash)
    .bind(data.role)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
