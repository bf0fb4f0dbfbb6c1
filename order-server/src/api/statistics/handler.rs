//! Statistics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::reporting::{self, SalesAnalytics};
use crate::utils::time::calculate_time_range;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    #[serde(rename = "timeRange", default = "default_time_range")]
    pub time_range: String,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

fn default_time_range() -> String {
    "all".to_string()
}

/// Workbook export response
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub files: Vec<String>,
}

async fn build_analytics(
    state: &ServerState,
    query: &StatisticsQuery,
) -> AppResult<SalesAnalytics> {
    let window = calculate_time_range(
        &query.time_range,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        state.config.timezone,
    )?;

    tracing::debug!(
        time_range = %query.time_range,
        window = ?window,
        "Building sales analytics"
    );

    let orders = OrderRepository::new(state.db.clone())
        .find_in_range(window)
        .await
        .map_err(AppError::from)?;

    Ok(reporting::build(&orders, state.config.timezone))
}

/// GET /api/statistics - 销售统计汇总
pub async fn get_statistics(
    State(state): State<ServerState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<SalesAnalytics>> {
    let analytics = build_analytics(&state, &query).await?;
    Ok(Json(analytics))
}

/// POST /api/statistics/export - 导出工作簿到 work_dir/exports
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<ExportResponse>> {
    let analytics = build_analytics(&state, &query).await?;

    let dir = state.config.exports_dir();
    let paths = reporting::export_workbook(&analytics, &dir)?;

    Ok(Json(ExportResponse {
        files: paths
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect(),
    }))
}
