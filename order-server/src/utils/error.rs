//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E3xxx | 认证令牌错误 | E3001 未登录 |
//! | E2xxx | 权限错误 | E2001 无权限 |
//! | E0xxx | 业务逻辑错误 | E0005 规则冲突 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (4xx) ==========
    #[error("Authentication required")]
    /// 未登录 (401)
    Unauthorized,

    #[error("Token expired")]
    /// 令牌过期 (401)
    TokenExpired,

    #[error("Invalid token: {0}")]
    /// 无效令牌 (401)
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    /// 无权限 (403)
    Forbidden(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// 业务规则违反 (422)
    BusinessRule(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),

    #[error("Invalid request: {0}")]
    /// 无效请求 (400)
    Invalid(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Please login first".to_string(),
            ),
            AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string())
            }
            AppError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".to_string())
            }

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Business rule (422)
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.clone()),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {}", e))
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Create an invalid credentials error with unified message
    /// Used to prevent email enumeration during login
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}
