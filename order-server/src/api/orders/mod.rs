//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/confirm", post(handler::confirm))
        .route("/{id}/dispatch", post(handler::dispatch))
        .route("/{id}/dispatch-all", post(handler::dispatch_all))
        .route("/{id}/reverse-dispatch", post(handler::reverse_dispatch))
        .route("/{id}/deliver", post(handler::deliver))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/invoice", get(handler::invoice))
}
