//! Cart API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::CartView;
use crate::services::cart;
use crate::utils::AppResult;

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: i64,
    /// Signed delta merged into the existing quantity
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

/// GET /api/cart - 获取购物车
pub async fn get_cart(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<CartView>> {
    let view = cart::get_cart(&state.pool, current_user.id).await?;
    Ok(Json(view))
}

/// POST /api/cart/items - 合并加入购物车
pub async fn add_item(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<CartView>> {
    let view = cart::add_to_cart(
        &state.pool,
        current_user.id,
        payload.product_id,
        payload.quantity,
    )
    .await?;
    Ok(Json(view))
}

/// PUT /api/cart/items/:product_id - 覆盖数量
pub async fn update_item(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(product_id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<CartView>> {
    let view = cart::update_cart_item(
        &state.pool,
        current_user.id,
        product_id,
        payload.quantity,
    )
    .await?;
    Ok(Json(view))
}

/// DELETE /api/cart/items/:product_id - 移除一项
pub async fn remove_item(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<CartView>> {
    let view = cart::remove_from_cart(&state.pool, current_user.id, product_id).await?;
    Ok(Json(view))
}

/// DELETE /api/cart - 清空购物车
pub async fn clear_cart(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<bool>> {
    cart::clear_cart(&state.pool, current_user.id).await?;
    Ok(Json(true))
}
