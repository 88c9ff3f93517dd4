//! Auth API Handlers

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

/// POST /api/auth/login - 用户登录，签发 JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let Some(account) = user::find_by_username(&state.pool, &payload.username).await? else {
        security_log!("WARN", "login_unknown_user", username = payload.username.clone());
        return Err(AppError::invalid_credentials());
    };

    if !account.is_active {
        security_log!("WARN", "login_inactive_user", user_id = account.id);
        return Err(AppError::invalid_credentials());
    }

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|e| AppError::Internal(format!("Corrupt password hash: {e}")))?;
    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        security_log!("WARN", "login_bad_password", user_id = account.id);
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service()
        .generate_token(&account)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = account.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user_id: account.id,
        username: account.username,
        role: account.role,
    }))
}
