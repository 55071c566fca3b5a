//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::reservation;
use crate::utils::time;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Reservation, ReservationCreate, ReservationUpdate};

/// Query params for listing reservations
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Local date (YYYY-MM-DD) in the business timezone
    pub date: Option<String>,
}

/// GET /api/reservations?date= - 获取预订列表 (按开始时间)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let tz = state.config.timezone;
    let range = match query.date {
        Some(date) => {
            let date = time::parse_date(&date)?;
            Some((time::day_start_millis(date, tz), time::day_end_millis(date, tz)))
        }
        None => None,
    };
    let reservations = reservation::find_all(state.pool(), range).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let found = reservation::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ReservationNotFound,
            format!("Reservation {} not found", id),
        )
    })?;
    Ok(Json(found))
}

/// POST /api/reservations - 创建预订 (默认时长 1 小时)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let created = reservation::create(state.pool(), payload).await?;
    tracing::info!(
        id = created.id,
        table = created.table_number,
        customer = %created.customer_name,
        starts_at = created.starts_at,
        "Reservation created"
    );
    Ok(Json(created))
}

/// PUT /api/reservations/:id - 修改预订
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    let updated = reservation::update(state.pool(), id, payload).await?;
    tracing::info!(id, table = updated.table_number, starts_at = updated.starts_at, "Reservation updated");
    Ok(Json(updated))
}

/// DELETE /api/reservations/:id - 取消预订
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    reservation::delete(state.pool(), id).await?;
    tracing::info!(id, "Reservation deleted");
    Ok(Json(true))
}
