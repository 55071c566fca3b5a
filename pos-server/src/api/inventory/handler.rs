//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::inventory;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_non_negative, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};
use shared::util::now_millis;

/// Response of `POST /api/inventory`
#[derive(Debug, Serialize)]
pub struct RestockResponse {
    pub item: InventoryItem,
    /// `false` when an existing ingredient was restocked
    pub created: bool,
}

/// GET /api/inventory - 获取库存列表 (按名称)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = inventory::find_all(state.pool()).await?;
    Ok(Json(items))
}

/// GET /api/inventory/low-stock - 低于预警值的库存
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = inventory::find_low_stock(state.pool()).await?;
    Ok(Json(items))
}

/// GET /api/inventory/:id - 获取单个库存项
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InventoryItem>> {
    let item = inventory::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::IngredientNotFound,
            format!("Ingredient {} not found", id),
        )
    })?;
    Ok(Json(item))
}

/// POST /api/inventory - 新增或补货 (同名累加)
pub async fn add_or_restock(
    State(state): State<ServerState>,
    Json(payload): Json<InventoryItemCreate>,
) -> AppResult<Json<RestockResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_non_negative(payload.quantity, "quantity")?;
    validate_non_negative(payload.min_alert_quantity, "min_alert_quantity")?;

    let (item, created) = inventory::add_or_restock(state.pool(), payload, now_millis()).await?;
    tracing::info!(
        id = item.id,
        name = %item.name,
        quantity = item.quantity,
        created,
        "Inventory item stocked"
    );
    Ok(Json(RestockResponse { item, created }))
}

/// PUT /api/inventory/:id - 设置库存数量、单位和预警值
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InventoryItemUpdate>,
) -> AppResult<Json<InventoryItem>> {
    validate_required_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_non_negative(payload.quantity, "quantity")?;
    validate_non_negative(payload.min_alert_quantity, "min_alert_quantity")?;

    let item = inventory::update(state.pool(), id, payload, now_millis()).await?;
    tracing::info!(id, name = %item.name, quantity = item.quantity, "Inventory item updated");
    Ok(Json(item))
}

/// DELETE /api/inventory/:id - 删除库存项 (未被配方使用时)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    inventory::delete(state.pool(), id).await?;
    tracing::info!(id, "Inventory item deleted");
    Ok(Json(true))
}
