//! Upload API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/uploads", post(handler::upload))
        .route("/api/uploads/{name}", axum::routing::delete(handler::remove))
        // Public object URL, outside /api (no auth)
        .route("/uploads/{name}", get(handler::serve))
}
