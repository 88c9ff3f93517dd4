//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`products`] - 商品目录接口
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::AppResult;

/// Compose all resource routers and cross-cutting layers
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Pagination query parameters shared by list endpoints
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageQuery {
    const DEFAULT_SIZE: i64 = 20;
    const MAX_SIZE: i64 = 100;
    // page * size 必须远离 i64 溢出
    const MAX_PAGE: i64 = 1_000_000;

    /// (limit, offset) with defaults and bounds applied
    pub fn limits(&self) -> (i64, i64) {
        let size = self.size.unwrap_or(Self::DEFAULT_SIZE).clamp(1, Self::MAX_SIZE);
        let page = self.page.unwrap_or(0).clamp(0, Self::MAX_PAGE);
        (size, page * size)
    }
}

#[cfg(test)]
mod tests {
    use super::PageQuery;

    #[test]
    fn limits_apply_defaults_and_bounds() {
        let query = PageQuery { page: None, size: None };
        assert_eq!(query.limits(), (20, 0));

        let query = PageQuery { page: Some(2), size: Some(10) };
        assert_eq!(query.limits(), (10, 20));

        let query = PageQuery { page: Some(-3), size: Some(0) };
        assert_eq!(query.limits(), (1, 0));

        let query = PageQuery { page: Some(1), size: Some(10_000) };
        assert_eq!(query.limits(), (100, 100));
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let query = PageQuery { page: Some(i64::MAX), size: Some(100) };
        let (limit, offset) = query.limits();
        assert_eq!(limit, 100);
        assert_eq!(offset, PageQuery::MAX_PAGE * 100);
        assert!(offset > 0);
    }
}
