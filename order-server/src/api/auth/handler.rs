//! Authentication Handlers
//!
//! Handles login, logout, and session introspection

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/login - 登录 (无需认证)
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_email(&req.email)
        .await
        .map_err(AppError::from)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.email, &user.display_name, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, email = %user.email, "User logged in successfully");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
        },
    }))
}

/// GET /api/auth/me - 当前会话信息
pub async fn me(Extension(user): Extension<CurrentUser>) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: user.role,
    }))
}

/// POST /api/auth/logout - 登出
///
/// Stateless tokens: the server only logs the event; the client drops
/// the token.
pub async fn logout(Extension(user): Extension<CurrentUser>) -> AppResult<Json<()>> {
    tracing::info!(user_id = %user.id, email = %user.email, "User logged out");
    Ok(Json(()))
}
