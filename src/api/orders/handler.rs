//! Order API Handlers
//!
//! Thin shims over the order service: parse, delegate, relay. All
//! invariants live below this layer.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatistics, OrderStatus};
use crate::services::order;
use crate::utils::{AppError, AppResult};

#[derive(Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub product_id: i64,
    #[validate(range(min = 1, max = 999))]
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl OrderListQuery {
    fn limits(&self) -> (i64, i64) {
        PageQuery {
            page: self.page,
            size: self.size,
        }
        .limits()
    }
}

/// POST /api/orders - 下单单个商品
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid_quantity(e.to_string()))?;
    let order = order::create_order(
        &state.pool,
        current_user.id,
        payload.product_id,
        payload.quantity,
    )
    .await?;
    Ok(Json(order))
}

/// POST /api/orders/from-cart - 购物车整体转订单
pub async fn create_from_cart(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::create_orders_from_cart(&state.pool, current_user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/my - 当前用户的订单 (买家视角)
pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let (limit, offset) = query.limits();
    let orders =
        order::get_user_orders(&state.pool, current_user.id, query.status, limit, offset).await?;
    Ok(Json(orders))
}

/// GET /api/orders/seller - 当前用户的订单 (卖家视角)
pub async fn seller_orders(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let (limit, offset) = query.limits();
    let orders =
        order::get_seller_orders(&state.pool, current_user.id, query.status, limit, offset).await?;
    Ok(Json(orders))
}

/// GET /api/orders/statistics - 当前用户的订单统计
pub async fn statistics(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<OrderStatistics>> {
    let stats = order::get_order_statistics(&state.pool, current_user.id).await?;
    Ok(Json(stats))
}

/// GET /api/orders/check-purchase/:product_id - 是否购买过该商品
pub async fn check_purchase(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<bool>> {
    let purchased =
        order::has_user_purchased_product(&state.pool, current_user.id, product_id).await?;
    Ok(Json(purchased))
}

/// GET /api/orders/:id - 订单详情 (仅买家或卖家)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order::get_order_for(&state.pool, id, current_user.id).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/status - 订单状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let order =
        order::update_order_status(&state.pool, id, payload.status, current_user.id).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/cancel - 买家取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order::cancel_order(&state.pool, id, current_user.id).await?;
    Ok(Json(order))
}
