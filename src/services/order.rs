//! 订单编排服务
//!
//! Creates orders from a single product or a whole cart, executes
//! validated status transitions, and keeps the stock ledger consistent:
//! order insert and stock decrement always share one transaction, as do
//! cancellation and stock release.

use crate::db::models::{Order, OrderStatistics, OrderStatus, Product};
use crate::db::repository::{cart, order as order_repo, product as product_repo, user as user_repo};
use crate::services::{order_security, pricing};
use crate::utils::time::{now_millis, snowflake_id};
use crate::utils::{AppError, AppResult};
use sqlx::SqlitePool;

/// Upper bound on units per order
pub const MAX_ORDER_QUANTITY: i64 = 999;

/// Create one PENDING order for `quantity` units of `product_id`.
///
/// The stock decrement and the order insert commit or roll back together.
/// A race lost to a concurrent buyer after the friendly pre-check still
/// surfaces as `InsufficientStock` — the conditional decrement inside the
/// transaction is the authoritative check.
pub async fn create_order(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> AppResult<Order> {
    let user = user_repo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;
    let product = product_repo::find_by_id(pool, product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {product_id}")))?;

    let order = build_order(user.id, &product, quantity)?;

    let mut tx = pool.begin().await?;
    if !product_repo::decrease_stock(&mut *tx, product.id, quantity).await? {
        return Err(AppError::InsufficientStock(format!(
            "requested {quantity} of product {product_id}, not enough stock"
        )));
    }
    order_repo::insert(&mut *tx, &order).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id,
        product_id,
        quantity,
        total_amount = order.total_amount,
        "order created"
    );
    Ok(order)
}

/// Convert the user's entire cart into orders, one order per cart line.
///
/// All-or-nothing: every line's stock decrement, every order insert and
/// the cart clear run in a single transaction. One line short on stock
/// rolls the whole conversion back.
pub async fn create_orders_from_cart(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<Order>> {
    user_repo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

    let items = cart::find_by_user(pool, user_id).await?;
    if items.is_empty() {
        return Err(AppError::EmptyCart);
    }

    // Snapshot products and validate every line before touching anything
    let mut lines = Vec::with_capacity(items.len());
    for item in &items {
        let product = product_repo::find_by_id(pool, item.product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", item.product_id)))?;
        let order = build_order(user_id, &product, item.quantity)?;
        lines.push(order);
    }

    let mut tx = pool.begin().await?;
    for order in &lines {
        if !product_repo::decrease_stock(&mut *tx, order.product_id, order.quantity).await? {
            return Err(AppError::InsufficientStock(format!(
                "requested {} of product {}, not enough stock",
                order.quantity, order.product_id
            )));
        }
        order_repo::insert(&mut *tx, order).await?;
    }
    cart::clear(&mut *tx, user_id).await?;
    tx.commit().await?;

    tracing::info!(user_id, order_count = lines.len(), "orders created from cart");
    Ok(lines)
}

/// Fetch one order, enforcing that only its buyer or seller may see it
pub async fn get_order_for(pool: &SqlitePool, order_id: i64, actor_id: i64) -> AppResult<Order> {
    let order = order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;
    if !order_security::can_view_order(&order, actor_id) {
        return Err(AppError::forbidden("Not a party to this order"));
    }
    Ok(order)
}

pub async fn get_user_orders(
    pool: &SqlitePool,
    user_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Order>> {
    Ok(order_repo::find_by_user(pool, user_id, status, limit, offset).await?)
}

pub async fn get_seller_orders(
    pool: &SqlitePool,
    seller_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Order>> {
    Ok(order_repo::find_by_seller(pool, seller_id, status, limit, offset).await?)
}

/// Execute an authorized status transition.
///
/// Checks run in this order: the state machine edge (so a terminal or
/// off-table request is `InvalidTransition` regardless of actor), then
/// the per-transition authorization table. The UPDATE itself is keyed on
/// the status we read, so losing a race to a concurrent transition
/// surfaces as `StaleState` instead of overwriting the winner.
pub async fn update_order_status(
    pool: &SqlitePool,
    order_id: i64,
    new_status: OrderStatus,
    actor_id: i64,
) -> AppResult<Order> {
    let order = order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

    if !order.status.can_transition_to(new_status) {
        return Err(AppError::InvalidTransition(format!(
            "{} -> {new_status} is not allowed",
            order.status
        )));
    }
    if !order_security::can_update_status(&order, actor_id, new_status) {
        tracing::warn!(order_id, actor_id, %new_status, "transition denied");
        return Err(AppError::forbidden(format!(
            "Actor may not move this order to {new_status}"
        )));
    }

    apply_transition(pool, &order, new_status).await?;

    tracing::info!(
        order_id,
        from = %order.status,
        to = %new_status,
        actor_id,
        "order status updated"
    );
    order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
}

/// Cancel an order as its buyer, releasing the stock reservation.
pub async fn cancel_order(pool: &SqlitePool, order_id: i64, user_id: i64) -> AppResult<Order> {
    let order = order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

    if !order_security::can_cancel_order(&order, user_id) {
        tracing::warn!(order_id, user_id, "cancel denied");
        return Err(AppError::forbidden("Only the buyer may cancel this order"));
    }
    if !order.status.can_cancel() {
        return Err(AppError::InvalidTransition(format!(
            "order in {} cannot be cancelled",
            order.status
        )));
    }

    apply_transition(pool, &order, OrderStatus::Cancelled).await?;

    tracing::info!(
        order_id,
        user_id,
        restored_quantity = order.quantity,
        "order cancelled"
    );
    order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
}

pub async fn get_order_statistics(pool: &SqlitePool, user_id: i64) -> AppResult<OrderStatistics> {
    Ok(order_repo::statistics(pool, user_id).await?)
}

pub async fn has_user_purchased_product(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> AppResult<bool> {
    Ok(order_repo::exists_by_user_and_product(pool, user_id, product_id).await?)
}

/// Flip the status with a conditional UPDATE; on a move into CANCELLED,
/// release the reserved stock in the same transaction. `sales_count`
/// stays where it is — cancellation reverses the stock effect only.
async fn apply_transition(pool: &SqlitePool, order: &Order, to: OrderStatus) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    if !order_repo::update_status_if(&mut *tx, order.id, order.status, to).await? {
        return Err(AppError::StaleState(format!(
            "order {} is no longer in {}",
            order.id, order.status
        )));
    }
    if to == OrderStatus::Cancelled {
        product_repo::increase_stock(&mut *tx, order.product_id, order.quantity).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Validate a line and build the order row with its price snapshot
fn build_order(user_id: i64, product: &Product, quantity: i64) -> AppResult<Order> {
    if !(1..=MAX_ORDER_QUANTITY).contains(&quantity) {
        return Err(AppError::invalid_quantity(format!(
            "quantity must be between 1 and {MAX_ORDER_QUANTITY}, got {quantity}"
        )));
    }
    if !product.is_purchasable() {
        return Err(AppError::NotPurchasable(format!(
            "product '{}' is not purchasable",
            product.name
        )));
    }
    if product.stock_quantity < quantity {
        return Err(AppError::InsufficientStock(format!(
            "requested {quantity}, stock has {}",
            product.stock_quantity
        )));
    }

    let unit_price = pricing::discounted_unit_price(product.price, product.discount)?;
    let total_amount = pricing::order_total(unit_price, quantity)?;
    let now = now_millis();

    Ok(Order {
        id: snowflake_id(),
        user_id,
        seller_id: product.creator_id,
        product_id: product.id,
        product_name: product.name.clone(),
        quantity,
        unit_price,
        total_amount,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    })
}
