//! 并发库存压力测试
//!
//! The conditional decrement must hold under concurrency: simultaneous
//! buyers can never drive stock below zero, and a losing buyer leaves no
//! half-written order behind.

mod common;

use market_server::AppError;
use market_server::db::models::Role;
use market_server::services::order;

#[tokio::test]
async fn two_racing_buyers_cannot_oversell() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let alice = common::create_user(&db.pool, "alice", Role::User).await;
    let bob = common::create_user(&db.pool, "bob", Role::User).await;
    let product = common::create_product(&db.pool, &seller, "widget", 10.0, 0.0, 5).await;

    let pool_a = db.pool.clone();
    let pool_b = db.pool.clone();
    let (res_a, res_b) = tokio::join!(
        tokio::spawn(async move { order::create_order(&pool_a, alice.id, product.id, 3).await }),
        tokio::spawn(async move { order::create_order(&pool_b, bob.id, product.id, 3).await }),
    );
    let res_a = res_a.expect("task a");
    let res_b = res_b.expect("task b");

    // 恰好一人成功
    assert_ne!(res_a.is_ok(), res_b.is_ok(), "exactly one buyer must win");
    let loser = if res_a.is_err() { res_a } else { res_b };
    assert!(
        matches!(loser, Err(AppError::InsufficientStock(_))),
        "loser must see insufficient stock, got {loser:?}"
    );

    let after = common::reload_product(&db.pool, product.id).await;
    assert_eq!(after.stock_quantity, 2);
    assert_eq!(after.sales_count, 3);

    // 输家没有留下订单
    let (order_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&db.pool)
        .await
        .expect("count orders");
    assert_eq!(order_count, 1);
}

#[tokio::test]
async fn concurrent_order_sweep_drains_stock_exactly() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let product = common::create_product(&db.pool, &seller, "widget", 5.0, 0.0, 50).await;

    let mut buyers = Vec::new();
    for i in 0..20 {
        buyers.push(common::create_user(&db.pool, &format!("buyer{i}"), Role::User).await);
    }

    // 20 个买家各买 5 件, 库存只够 10 单
    let mut handles = Vec::new();
    for buyer in &buyers {
        let pool = db.pool.clone();
        let buyer_id = buyer.id;
        let product_id = product.id;
        handles.push(tokio::spawn(async move {
            order::create_order(&pool, buyer_id, product_id, 5).await
        }));
    }

    let mut ok = 0;
    for handle in handles {
        match handle.await.expect("join buyer task") {
            Ok(_) => ok += 1,
            Err(AppError::InsufficientStock(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(ok, 10);

    let after = common::reload_product(&db.pool, product.id).await;
    assert_eq!(after.stock_quantity, 0);
    assert_eq!(after.sales_count, 50);

    let (order_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&db.pool)
        .await
        .expect("count orders");
    assert_eq!(order_count, 10);
}

#[tokio::test]
async fn cancellation_makes_stock_available_to_the_next_buyer() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let alice = common::create_user(&db.pool, "alice", Role::User).await;
    let bob = common::create_user(&db.pool, "bob", Role::User).await;
    let product = common::create_product(&db.pool, &seller, "widget", 10.0, 0.0, 3).await;

    let first = order::create_order(&db.pool, alice.id, product.id, 3)
        .await
        .expect("alice takes all stock");

    let err = order::create_order(&db.pool, bob.id, product.id, 1)
        .await
        .expect_err("bob finds nothing left");
    assert!(matches!(err, AppError::NotPurchasable(_)), "got {err:?}");

    order::cancel_order(&db.pool, first.id, alice.id)
        .await
        .expect("alice cancels");

    order::create_order(&db.pool, bob.id, product.id, 1)
        .await
        .expect("released stock is buyable again");

    let after = common::reload_product(&db.pool, product.id).await;
    assert_eq!(after.stock_quantity, 2);
}
