//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, StockUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await.map_err(AppError::from)?;

    tracing::info!(product = %product.id.as_ref().map(|t| t.to_string()).unwrap_or_default(), "Product created");
    Ok(Json(product))
}

/// PUT /api/products/:id - 更新商品 (描述性字段)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await.map_err(AppError::from)?;
    Ok(Json(product))
}

/// PUT /api/products/:id/stock - 手工修改库存
///
/// 直接设置新数量，账本记一条 MANUAL_UPDATE。不校验未发货订单的
/// 预留量 — 手工修改是受信输入。
pub async fn update_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StockUpdate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .update_stock(&id, payload.stock)
        .await
        .map_err(AppError::from)?;

    tracing::info!(product = %id, stock = payload.stock, "Stock manually updated");
    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(AppError::from)?;
    Ok(Json(true))
}
