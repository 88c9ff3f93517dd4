//! Product Repository & Stock Ledger
//!
//! The stock ledger lives here: `decrease_stock` is a single conditional
//! UPDATE whose affected-row count is the success signal, so the
//! read-check-write of `stock_quantity` is indivisible with respect to
//! concurrent callers. No application-level lock is held.

use super::{RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate};
use crate::utils::time::{now_millis, snowflake_id};
use sqlx::SqliteExecutor;

const PRODUCT_SELECT: &str = "SELECT id, name, description, price, discount, stock_quantity, \
     sales_count, is_available, creator_id, created_at, updated_at FROM products";

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_available(
    ex: impl SqliteExecutor<'_>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE is_available = 1 ORDER BY created_at DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

pub async fn create(
    pool: &sqlx::SqlitePool,
    creator_id: i64,
    data: ProductCreate,
) -> RepoResult<Product> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO products (id, name, description, price, discount, stock_quantity, \
         sales_count, is_available, creator_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.discount)
    .bind(data.stock_quantity)
    .bind(data.is_available)
    .bind(creator_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Unconditionally add `qty` units back to stock.
///
/// `sales_count` is deliberately left alone: cancellation reverses the
/// stock effect but historical sales are preserved.
pub async fn increase_stock(
    ex: impl SqliteExecutor<'_>,
    product_id: i64,
    qty: i64,
) -> RepoResult<()> {
    if qty <= 0 {
        return Err(RepoError::Validation(format!(
            "stock increase must be positive, got {qty}"
        )));
    }
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE products SET stock_quantity = stock_quantity + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(qty)
    .bind(now)
    .bind(product_id)
    .execute(ex)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {product_id}")));
    }
    Ok(())
}

/// Atomically move `qty` units from stock to sales.
///
/// Returns `Ok(false)` when stock is insufficient — that is an ordinary
/// outcome the caller branches on, not an error. The `stock_quantity >= qty`
/// predicate makes two racing decrements that together exceed stock
/// impossible: at most one UPDATE matches the row.
pub async fn decrease_stock(
    ex: impl SqliteExecutor<'_>,
    product_id: i64,
    qty: i64,
) -> RepoResult<bool> {
    if qty <= 0 {
        return Err(RepoError::Validation(format!(
            "stock decrease must be positive, got {qty}"
        )));
    }
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE products SET stock_quantity = stock_quantity - ?1, \
         sales_count = sales_count + ?1, updated_at = ?2 \
         WHERE id = ?3 AND stock_quantity >= ?1",
    )
    .bind(qty)
    .bind(now)
    .bind(product_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}
