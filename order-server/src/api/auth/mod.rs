//! Auth API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/logout", post(handler::logout))
        .route("/api/auth/me", get(handler::me))
}
