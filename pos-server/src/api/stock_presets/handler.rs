//! Stock Preset API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::stock_preset;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::models::{StockPreset, StockPresetApplied, StockPresetCreate};
use shared::util::now_millis;

/// GET /api/stock-presets - 获取进货预设列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StockPreset>>> {
    let presets = stock_preset::find_all(state.pool()).await?;
    Ok(Json(presets))
}

/// POST /api/stock-presets - 创建进货预设
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StockPresetCreate>,
) -> AppResult<Json<StockPreset>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    for item in &payload.items {
        validate_required_text(&item.name, "item name", MAX_NAME_LEN)?;
        validate_required_text(&item.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    }

    let preset = stock_preset::create(state.pool(), payload, now_millis()).await?;
    tracing::info!(id = preset.id, name = %preset.name, items = preset.items.len(), "Stock preset created");
    Ok(Json(preset))
}

/// DELETE /api/stock-presets/:id - 删除进货预设
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    stock_preset::delete(state.pool(), id).await?;
    tracing::info!(id, "Stock preset deleted");
    Ok(Json(true))
}

/// POST /api/stock-presets/:id/apply - 按预设补货 (单事务)
pub async fn apply(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StockPresetApplied>> {
    let applied = stock_preset::apply(state.pool(), id, now_millis()).await?;
    tracing::info!(
        id,
        preset = %applied.preset_name,
        created = applied.created.len(),
        restocked = applied.restocked.len(),
        "Stock preset applied"
    );
    Ok(Json(applied))
}
