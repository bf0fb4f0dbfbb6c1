//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (上传文件的公开 URL 等)
/// - `/api/auth/login` (登录接口)
/// - `/api/health` (健康检查)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // 公共 API 路由跳过认证
    let is_public_api_route = path == "/api/auth/login" || path == "/api/health";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Request without credentials");
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 管理员中间件 - 要求管理员角色
///
/// 检查 `CurrentUser.role == "admin"`，非管理员返回 403
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            email = %user.email,
            "Admin-only route rejected"
        );
        return Err(AppError::forbidden("Administrator role required"));
    }

    Ok(next.run(req).await)
}
