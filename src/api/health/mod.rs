//! 健康检查接口

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: i64,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - 服务与数据库健康状态
async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unreachable");
            "down"
        }
    };
    Ok(Json(HealthResponse {
        status: "ok",
        database,
        timestamp: crate::utils::time::now_millis(),
    }))
}
