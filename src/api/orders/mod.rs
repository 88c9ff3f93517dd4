//! 订单 API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/from-cart", post(handler::create_from_cart))
        .route("/my", get(handler::my_orders))
        .route("/seller", get(handler::seller_orders))
        .route("/statistics", get(handler::statistics))
        .route("/check-purchase/{product_id}", get(handler::check_purchase))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/cancel", put(handler::cancel))
}
