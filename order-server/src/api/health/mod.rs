//! Health API 模块

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::core::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - 健康检查 (无需认证)
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}
