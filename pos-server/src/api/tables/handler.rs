//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::utils::time;
use crate::utils::{AppError, AppResult};
use shared::models::{DiningTable, DiningTableCreate, TableState};
use shared::util::now_millis;

/// Query params for availability
///
/// `at` (Unix millis) wins; otherwise `date` + `time` in the business
/// timezone; otherwise now.
#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub at: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// GET /api/tables - 获取所有桌台及状态 (含数字桌 99)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TableState>>> {
    let tz = state.config.timezone;
    let day_end = time::day_end_millis(time::today(tz), tz);
    let tables = dining_table::find_all_with_state(state.pool(), now_millis(), day_end).await?;
    Ok(Json(tables))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    let table = dining_table::create(state.pool(), payload).await?;
    tracing::info!(number = table.number, capacity = table.capacity, "Table created");
    Ok(Json(table))
}

/// GET /api/tables/available - 指定时间可用的桌台
pub async fn list_available(
    State(state): State<ServerState>,
    Query(query): Query<AvailableQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tz = state.config.timezone;
    let at = match (query.at, query.date, query.time) {
        (Some(at), _, _) => at,
        (None, Some(date), Some(t)) => {
            time::date_time_to_millis(time::parse_date(&date)?, time::parse_time(&t)?, tz)
        }
        (None, None, None) => now_millis(),
        _ => {
            return Err(AppError::invalid_request(
                "date and time must be given together",
            ));
        }
    };

    let tables = dining_table::find_available_at(state.pool(), at).await?;
    Ok(Json(tables))
}

/// DELETE /api/tables/:number - 删除桌台 (无预订、无未结订单)
pub async fn delete(
    State(state): State<ServerState>,
    Path(number): Path<i64>,
) -> AppResult<Json<bool>> {
    dining_table::delete(state.pool(), number).await?;
    tracing::info!(number, "Table deleted");
    Ok(Json(true))
}
