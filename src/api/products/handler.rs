//! Product API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use validator::Validate;

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate};
use crate::db::repository::product;
use crate::utils::{AppError, AppResult};

/// GET /api/products - 上架商品列表 (分页)
pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let (limit, offset) = page.limits();
    let products = product::find_available(&state.pool, limit, offset).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 商品详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品 (卖家/管理员)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    if !current_user.role.can_manage_products() {
        return Err(AppError::forbidden("Only sellers may list products"));
    }
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let product = product::create(&state.pool, current_user.id, payload).await?;
    tracing::info!(product_id = product.id, seller_id = current_user.id, "product listed");
    Ok(Json(product))
}
