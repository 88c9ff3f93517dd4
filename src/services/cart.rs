//! 购物车服务
//!
//! The cart is a per-user draft, not a ledger of truth: last-write-wins
//! across calls is acceptable, but each single operation is atomic (one
//! transaction, no lost update inside a call).

use crate::db::models::{CartItem, CartView};
use crate::db::repository::{cart, product};
use crate::utils::{AppError, AppResult};
use sqlx::SqlitePool;

/// Application-level sane bound for one cart line
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Fetch the user's cart. An absent cart is an empty cart — carts are
/// created lazily by the first add.
pub async fn get_cart(pool: &SqlitePool, user_id: i64) -> AppResult<CartView> {
    let items = cart::find_by_user(pool, user_id).await?;
    Ok(CartView { user_id, items })
}

/// Merge `delta` into the user's cart line for `product_id`.
///
/// A missing line with a positive delta inserts; sums of zero remove the
/// line; a sum that would go negative fails without mutating anything.
///
/// The transaction opens with the arithmetic UPDATE so the in-range
/// merge of an existing line is a single write statement; the read runs
/// only on the fallback paths, after the write lock is already held.
pub async fn add_to_cart(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    delta: i64,
) -> AppResult<CartView> {
    if delta == 0 {
        return Err(AppError::invalid_quantity("quantity delta must be non-zero"));
    }
    let Some(_) = product::find_by_id(pool, product_id).await? else {
        return Err(AppError::not_found(format!("Product {product_id}")));
    };

    let mut tx = pool.begin().await?;
    if !cart::merge_item(&mut *tx, user_id, product_id, delta, MAX_ITEM_QUANTITY).await? {
        // 没有可合并的行, 或者合并结果出界: 读清楚再分情况
        let current = cart::find_item(&mut *tx, user_id, product_id)
            .await?
            .map(|item| item.quantity)
            .unwrap_or(0);
        let merged = current + delta;

        if merged < 0 {
            return Err(AppError::invalid_quantity(format!(
                "cannot remove {} of product {product_id}, cart holds {current}",
                -delta
            )));
        }
        if merged > MAX_ITEM_QUANTITY {
            return Err(AppError::invalid_quantity(format!(
                "cart quantity capped at {MAX_ITEM_QUANTITY}, requested {merged}"
            )));
        }
        if merged == 0 {
            cart::delete_item(&mut *tx, user_id, product_id).await?;
        } else {
            // 行不存在且 delta 在界内: 插入新行
            cart::upsert_item(&mut *tx, user_id, product_id, merged).await?;
        }
    }
    tx.commit().await?;

    tracing::debug!(user_id, product_id, delta, "cart merged");
    get_cart(pool, user_id).await
}

/// Overwrite the quantity of one cart line unconditionally
pub async fn update_cart_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> AppResult<CartView> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(AppError::invalid_quantity(format!(
            "quantity must be between 1 and {MAX_ITEM_QUANTITY}, got {quantity}"
        )));
    }
    let Some(_) = product::find_by_id(pool, product_id).await? else {
        return Err(AppError::not_found(format!("Product {product_id}")));
    };
    cart::upsert_item(pool, user_id, product_id, quantity).await?;
    get_cart(pool, user_id).await
}

pub async fn remove_from_cart(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> AppResult<CartView> {
    cart::delete_item(pool, user_id, product_id).await?;
    get_cart(pool, user_id).await
}

pub async fn clear_cart(pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    let removed = cart::clear(pool, user_id).await?;
    tracing::debug!(user_id, removed, "cart cleared");
    Ok(())
}

/// Items the order orchestrator converts; read path shared with [`get_cart`]
pub async fn cart_items(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<CartItem>> {
    Ok(cart::find_by_user(pool, user_id).await?)
}
