//! Order Repository
//!
//! Status changes go through `update_status_if`: a conditional UPDATE
//! keyed on the expected current status, so a check-then-set that loses
//! a race affects zero rows instead of silently overwriting the winner.

use super::{RepoError, RepoResult};
use crate::db::models::{Order, OrderStatistics, OrderStatus};
use crate::utils::time::now_millis;
use sqlx::SqliteExecutor;

const ORDER_SELECT: &str = "SELECT id, user_id, seller_id, product_id, product_name, quantity, \
     unit_price, total_amount, status, created_at, updated_at FROM orders";

pub async fn insert(ex: impl SqliteExecutor<'_>, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, seller_id, product_id, product_name, quantity, \
         unit_price, total_amount, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.seller_id)
    .bind(order.product_id)
    .bind(&order.product_name)
    .bind(order.quantity)
    .bind(order.unit_price)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_by_user(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    list_for("user_id", ex, user_id, status, limit, offset).await
}

pub async fn find_by_seller(
    ex: impl SqliteExecutor<'_>,
    seller_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    list_for("seller_id", ex, seller_id, status, limit, offset).await
}

async fn list_for(
    column: &str,
    ex: impl SqliteExecutor<'_>,
    owner_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(status) => {
            let sql = format!(
                "{ORDER_SELECT} WHERE {column} = ? AND status = ? \
                 ORDER BY created_at DESC LIMIT ? OFFSET ?"
            );
            sqlx::query_as::<_, Order>(&sql)
                .bind(owner_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(ex)
                .await?
        }
        None => {
            let sql = format!(
                "{ORDER_SELECT} WHERE {column} = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
            );
            sqlx::query_as::<_, Order>(&sql)
                .bind(owner_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(ex)
                .await?
        }
    };
    Ok(rows)
}

/// Conditionally move an order from `from` to `to`.
///
/// Returns `Ok(false)` when the order is no longer in `from` (a concurrent
/// transition won the race) or does not exist; the caller distinguishes
/// the two with a follow-up read if it cares.
pub async fn update_status_if(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(to)
        .bind(now)
        .bind(order_id)
        .bind(from)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn statistics(ex: impl SqliteExecutor<'_>, user_id: i64) -> RepoResult<OrderStatistics> {
    let stats = sqlx::query_as::<_, OrderStatistics>(
        "SELECT COUNT(*) AS total_orders, \
         COALESCE(SUM(CASE WHEN status = 'PENDING' THEN 1 ELSE 0 END), 0) AS pending_orders, \
         COALESCE(SUM(CASE WHEN status = 'COMPLETED' THEN 1 ELSE 0 END), 0) AS completed_orders, \
         COALESCE(SUM(total_amount), 0) AS total_amount \
         FROM orders WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(ex)
    .await?;
    stats.ok_or_else(|| RepoError::Database("statistics query returned no row".into()))
}

pub async fn exists_by_user_and_product(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    product_id: i64,
) -> RepoResult<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM orders WHERE user_id = ? AND product_id = ? LIMIT 1")
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(ex)
            .await?;
    Ok(row.is_some())
}
