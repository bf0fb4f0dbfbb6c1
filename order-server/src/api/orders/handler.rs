//! Order API Handlers
//!
//! CRUD plus the confirm / dispatch / reverse workflow. Workflow routes
//! delegate to the [`DispatchEngine`]; plain CRUD goes straight to the
//! repository.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderItem, OrderUpdate};
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::dispatch::DispatchEngine;
use crate::invoice::InvoiceRenderer;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};
use shared::{DispatchLine, OrderStatus};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub status: Option<OrderStatus>,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/orders - 获取订单列表 (分页，可按状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = match query.status {
        Some(status) => repo.find_by_status(status).await.map_err(AppError::from)?,
        None => repo
            .find_all(query.limit, query.offset)
            .await
            .map_err(AppError::from)?,
    };
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order))
}

/// POST /api/orders - 创建订单
///
/// 商品名称/单位/价格从商品表快照，不信任客户端提交的值。
/// 新订单始终是 Unconfirmed，不扣库存。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;

    let products = ProductRepository::new(state.db.clone());
    let mut items = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        if line.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Invalid quantity {} for {}",
                line.quantity, line.product
            )));
        }
        let product = products
            .find_by_id(&line.product)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found(format!("Product {}", line.product)))?;

        items.push(OrderItem {
            product: product.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            product_name: product.name,
            unit: product.unit,
            quantity: line.quantity,
            price: product.price,
            dispatched_quantity: 0,
        });
    }

    let now = now_millis();
    let order = Order {
        id: None,
        customer_name: payload.customer_name,
        customer_city: payload.customer_city,
        customer_phone: payload.customer_phone,
        delivery_location: payload.delivery_location,
        status: OrderStatus::Unconfirmed,
        items,
        dispatched_items: Vec::new(),
        delivered_by: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(order).await.map_err(AppError::from)?;

    tracing::info!(order_id = %order.id_string(), items = order.items.len(), "Order created");
    Ok(Json(order))
}

/// PUT /api/orders/:id - 更新订单客户信息
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update(&id, payload).await.map_err(AppError::from)?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - 删除订单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = OrderRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(AppError::from)?;
    Ok(Json(true))
}

// =============================================================================
// Workflow transitions
// =============================================================================

/// Partial dispatch request body
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub lines: Vec<DispatchLine>,
    #[serde(default)]
    pub transport: Option<String>,
}

/// Full dispatch / reversal request body
#[derive(Debug, Deserialize, Default)]
pub struct FullDispatchRequest {
    #[serde(default)]
    pub transport: Option<String>,
}

/// POST /api/orders/:id/confirm - 确认订单，扣减库存
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = DispatchEngine::new(state.db.clone()).confirm(&id).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/dispatch - 部分发货
pub async fn dispatch(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DispatchRequest>,
) -> AppResult<Json<Order>> {
    let order = DispatchEngine::new(state.db.clone())
        .dispatch(&id, payload.lines, payload.transport)
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/dispatch-all - 发出全部剩余数量
pub async fn dispatch_all(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Option<Json<FullDispatchRequest>>,
) -> AppResult<Json<Order>> {
    let transport = payload.and_then(|Json(p)| p.transport);
    let order = DispatchEngine::new(state.db.clone())
        .dispatch_all(&id, transport)
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/reverse-dispatch - 撤销发货，回补库存
pub async fn reverse_dispatch(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = DispatchEngine::new(state.db.clone()).reverse(&id).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/deliver - 标记送达
pub async fn deliver(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = DispatchEngine::new(state.db.clone()).deliver(&id).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = DispatchEngine::new(state.db.clone()).cancel(&id).await?;
    Ok(Json(order))
}

/// GET /api/orders/:id/invoice - 文本发票
pub async fn invoice(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    let document = InvoiceRenderer::new(state.config.timezone).render(&order);
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        document,
    ))
}
