//! Cart Repository
//!
//! Rows exist only with quantity >= 1; the merge logic in the cart
//! service deletes rows that reach zero.

use super::RepoResult;
use crate::db::models::CartItem;
use crate::utils::time::now_millis;
use sqlx::SqliteExecutor;

const CART_SELECT: &str =
    "SELECT user_id, product_id, quantity, created_at, updated_at FROM cart_items";

pub async fn find_by_user(ex: impl SqliteExecutor<'_>, user_id: i64) -> RepoResult<Vec<CartItem>> {
    let sql = format!("{CART_SELECT} WHERE user_id = ? ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, CartItem>(&sql)
        .bind(user_id)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

pub async fn find_item(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    product_id: i64,
) -> RepoResult<Option<CartItem>> {
    let sql = format!("{CART_SELECT} WHERE user_id = ? AND product_id = ?");
    let row = sqlx::query_as::<_, CartItem>(&sql)
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Merge `delta` into an existing cart line, bounded to `1..=max`.
///
/// Conditional arithmetic UPDATE in the decrease_stock mould: the
/// predicate keeps the merged quantity in range, and zero rows affected
/// means "no line, or the merge leaves the valid range" — the caller
/// resolves which inside the same transaction. As the first statement
/// of a transaction this is a write, so the connection takes its write
/// lock immediately instead of upgrading a read snapshot later.
pub async fn merge_item(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    product_id: i64,
    delta: i64,
    max: i64,
) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE cart_items SET quantity = quantity + ?1, updated_at = ?2 \
         WHERE user_id = ?3 AND product_id = ?4 \
         AND quantity + ?1 BETWEEN 1 AND ?5",
    )
    .bind(delta)
    .bind(now)
    .bind(user_id)
    .bind(product_id)
    .bind(max)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Insert or overwrite a cart line with the given quantity (must be >= 1)
pub async fn upsert_item(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO cart_items (user_id, product_id, quantity, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?4) \
         ON CONFLICT (user_id, product_id) \
         DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

/// Remove one line; returns whether a row existed
pub async fn delete_item(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    product_id: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
        .bind(user_id)
        .bind(product_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn clear(ex: impl SqliteExecutor<'_>, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}
