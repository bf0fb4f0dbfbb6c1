//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use crate::db::repository::CustomerRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/customers - 获取所有客户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customers = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(customers))
}

/// GET /api/customers/:id - 获取单个客户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Customer>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Customer {}", id)))?;
    Ok(Json(customer))
}

/// POST /api/customers - 创建客户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    payload.validate()?;

    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo.create(payload).await.map_err(AppError::from)?;
    Ok(Json(customer))
}

/// PUT /api/customers/:id - 更新客户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo.update(&id, payload).await.map_err(AppError::from)?;
    Ok(Json(customer))
}

/// DELETE /api/customers/:id - 删除客户
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CustomerRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(AppError::from)?;
    Ok(Json(true))
}
