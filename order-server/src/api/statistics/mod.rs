//! Statistics API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/statistics", get(handler::get_statistics))
        .route("/api/statistics/export", post(handler::export))
}
