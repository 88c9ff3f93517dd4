//! 购物车集成测试
//!
//! Merge semantics, the quantity bounds, and the all-or-nothing cart to
//! order conversion.

mod common;

use market_server::AppError;
use market_server::db::models::Role;
use market_server::services::{cart, order};

#[tokio::test]
async fn cart_is_created_lazily_and_merges_quantities() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let product = common::create_product(&db.pool, &seller, "widget", 10.0, 0.0, 50).await;

    // 未创建的购物车读出来就是空
    let view = cart::get_cart(&db.pool, buyer.id).await.expect("empty cart");
    assert!(view.is_empty());

    let view = cart::add_to_cart(&db.pool, buyer.id, product.id, 2)
        .await
        .expect("first add inserts the line");
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].quantity, 2);

    let view = cart::add_to_cart(&db.pool, buyer.id, product.id, 3)
        .await
        .expect("second add merges");
    assert_eq!(view.items[0].quantity, 5);

    let view = cart::add_to_cart(&db.pool, buyer.id, product.id, -4)
        .await
        .expect("negative delta subtracts");
    assert_eq!(view.items[0].quantity, 1);
}

#[tokio::test]
async fn concurrent_merges_serialize_without_losing_updates() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let product = common::create_product(&db.pool, &seller, "widget", 10.0, 0.0, 50).await;

    cart::add_to_cart(&db.pool, buyer.id, product.id, 1)
        .await
        .expect("seed the line");

    // 同一行上的并发合并必须全部成功并全部生效
    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = db.pool.clone();
        let buyer_id = buyer.id;
        let product_id = product.id;
        handles.push(tokio::spawn(async move {
            cart::add_to_cart(&pool, buyer_id, product_id, 1).await
        }));
    }
    for handle in handles {
        handle.await.expect("join merge task").expect("merge succeeds");
    }

    let view = cart::get_cart(&db.pool, buyer.id).await.expect("reload");
    assert_eq!(view.items[0].quantity, 9);
}

#[tokio::test]
async fn merging_to_zero_removes_the_line() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let product = common::create_product(&db.pool, &seller, "widget", 10.0, 0.0, 50).await;

    cart::add_to_cart(&db.pool, buyer.id, product.id, 3)
        .await
        .expect("add");
    let view = cart::add_to_cart(&db.pool, buyer.id, product.id, -3)
        .await
        .expect("merge to zero");
    assert!(view.is_empty());
}

#[tokio::test]
async fn merge_below_zero_fails_without_mutating() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let product = common::create_product(&db.pool, &seller, "widget", 10.0, 0.0, 50).await;

    cart::add_to_cart(&db.pool, buyer.id, product.id, 2)
        .await
        .expect("add");

    let err = cart::add_to_cart(&db.pool, buyer.id, product.id, -5)
        .await
        .expect_err("cannot remove more than the cart holds");
    assert!(matches!(err, AppError::InvalidQuantity(_)), "got {err:?}");

    let view = cart::get_cart(&db.pool, buyer.id).await.expect("reload");
    assert_eq!(view.items[0].quantity, 2);
}

#[tokio::test]
async fn cart_line_quantity_is_capped() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let product = common::create_product(&db.pool, &seller, "widget", 10.0, 0.0, 50).await;

    cart::add_to_cart(&db.pool, buyer.id, product.id, 999)
        .await
        .expect("cap itself is fine");

    let err = cart::add_to_cart(&db.pool, buyer.id, product.id, 1)
        .await
        .expect_err("one past the cap");
    assert!(matches!(err, AppError::InvalidQuantity(_)), "got {err:?}");

    let err = cart::update_cart_item(&db.pool, buyer.id, product.id, 1000)
        .await
        .expect_err("overwrite past the cap");
    assert!(matches!(err, AppError::InvalidQuantity(_)), "got {err:?}");
}

#[tokio::test]
async fn unknown_product_cannot_enter_the_cart() {
    let db = common::setup().await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;

    let err = cart::add_to_cart(&db.pool, buyer.id, 424242, 1)
        .await
        .expect_err("no such product");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn remove_and_clear_are_idempotent() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let a = common::create_product(&db.pool, &seller, "a", 10.0, 0.0, 50).await;
    let b = common::create_product(&db.pool, &seller, "b", 20.0, 0.0, 50).await;

    cart::add_to_cart(&db.pool, buyer.id, a.id, 1).await.expect("add a");
    cart::add_to_cart(&db.pool, buyer.id, b.id, 2).await.expect("add b");

    let view = cart::remove_from_cart(&db.pool, buyer.id, a.id)
        .await
        .expect("remove a");
    assert_eq!(view.items.len(), 1);

    // 再删一次不报错
    cart::remove_from_cart(&db.pool, buyer.id, a.id)
        .await
        .expect("remove absent line");

    cart::clear_cart(&db.pool, buyer.id).await.expect("clear");
    cart::clear_cart(&db.pool, buyer.id).await.expect("clear empty");
    let view = cart::get_cart(&db.pool, buyer.id).await.expect("reload");
    assert!(view.is_empty());
}

#[tokio::test]
async fn converting_the_cart_yields_one_order_per_line_and_empties_it() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let a = common::create_product(&db.pool, &seller, "a", 10.0, 0.0, 50).await;
    let b = common::create_product(&db.pool, &seller, "b", 19.99, 15.0, 50).await;

    cart::add_to_cart(&db.pool, buyer.id, a.id, 2).await.expect("add a");
    cart::add_to_cart(&db.pool, buyer.id, b.id, 3).await.expect("add b");

    let orders = order::create_orders_from_cart(&db.pool, buyer.id)
        .await
        .expect("convert cart");
    assert_eq!(orders.len(), 2);

    let line_b = orders
        .iter()
        .find(|o| o.product_id == b.id)
        .expect("order for b");
    assert_eq!(line_b.unit_price, 16.99);
    assert_eq!(line_b.total_amount, 50.97);

    let view = cart::get_cart(&db.pool, buyer.id).await.expect("reload cart");
    assert!(view.is_empty(), "conversion clears the cart");

    assert_eq!(common::reload_product(&db.pool, a.id).await.stock_quantity, 48);
    assert_eq!(common::reload_product(&db.pool, b.id).await.stock_quantity, 47);
}

#[tokio::test]
async fn converting_an_empty_cart_is_an_error() {
    let db = common::setup().await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;

    let err = order::create_orders_from_cart(&db.pool, buyer.id)
        .await
        .expect_err("nothing to convert");
    assert!(matches!(err, AppError::EmptyCart), "got {err:?}");
}

#[tokio::test]
async fn cart_conversion_is_all_or_nothing() {
    let db = common::setup().await;
    let seller = common::create_user(&db.pool, "seller", Role::Seller).await;
    let buyer = common::create_user(&db.pool, "buyer", Role::User).await;
    let plenty = common::create_product(&db.pool, &seller, "plenty", 10.0, 0.0, 50).await;
    let scarce = common::create_product(&db.pool, &seller, "scarce", 10.0, 0.0, 2).await;

    cart::add_to_cart(&db.pool, buyer.id, plenty.id, 5).await.expect("add plenty");
    cart::add_to_cart(&db.pool, buyer.id, scarce.id, 2).await.expect("add scarce");

    // 并发买家抢走了稀缺商品的库存
    order::create_order(&db.pool, seller.id, scarce.id, 1)
        .await
        .expect("competing order");

    let err = order::create_orders_from_cart(&db.pool, buyer.id)
        .await
        .expect_err("short line sinks the whole conversion");
    assert!(matches!(err, AppError::InsufficientStock(_)), "got {err:?}");

    // 没有订单, 没有库存变动, 购物车原样保留
    let (order_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = ?")
            .bind(buyer.id)
            .fetch_one(&db.pool)
            .await
            .expect("count buyer orders");
    assert_eq!(order_count, 0);
    assert_eq!(common::reload_product(&db.pool, plenty.id).await.stock_quantity, 50);
    assert_eq!(common::reload_product(&db.pool, scarce.id).await.stock_quantity, 1);

    let view = cart::get_cart(&db.pool, buyer.id).await.expect("reload cart");
    assert_eq!(view.items.len(), 2);
}
