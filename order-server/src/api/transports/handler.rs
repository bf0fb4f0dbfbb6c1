//! Transport API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Transport, TransportCreate, TransportUpdate};
use crate::db::repository::TransportRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/transports - 获取所有运输公司
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Transport>>> {
    let repo = TransportRepository::new(state.db.clone());
    let transports = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(transports))
}

/// GET /api/transports/:id - 获取单个运输公司
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Transport>> {
    let repo = TransportRepository::new(state.db.clone());
    let transport = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Transport {}", id)))?;
    Ok(Json(transport))
}

/// POST /api/transports - 创建运输公司
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransportCreate>,
) -> AppResult<Json<Transport>> {
    payload.validate()?;

    let repo = TransportRepository::new(state.db.clone());
    let transport = repo.create(payload).await.map_err(AppError::from)?;
    Ok(Json(transport))
}

/// PUT /api/transports/:id - 更新运输公司
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransportUpdate>,
) -> AppResult<Json<Transport>> {
    let repo = TransportRepository::new(state.db.clone());
    let transport = repo.update(&id, payload).await.map_err(AppError::from)?;
    Ok(Json(transport))
}

/// DELETE /api/transports/:id - 删除运输公司
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = TransportRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(AppError::from)?;
    Ok(Json(true))
}
