//! Menu API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::menu;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemKey};

/// Seed result
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub inserted: usize,
}

/// GET /api/menu - 获取菜单 (按类别、名称排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let items = menu::find_all(state.pool()).await?;
    Ok(Json(items))
}

/// POST /api/menu - 新增菜单项
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.kind, "kind", MAX_SHORT_TEXT_LEN)?;
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::MenuItemInvalidPrice,
            format!("price must be a non-negative number, got {}", payload.price),
        ));
    }

    let item = menu::create(state.pool(), payload).await?;
    tracing::info!(id = item.id, name = %item.name, kind = %item.kind, "Menu item created");
    Ok(Json(item))
}

/// DELETE /api/menu?name=&kind= - 删除菜单项
pub async fn delete(
    State(state): State<ServerState>,
    Query(key): Query<MenuItemKey>,
) -> AppResult<Json<bool>> {
    validate_required_text(&key.name, "name", MAX_NAME_LEN)?;
    menu::delete(state.pool(), key.name.trim(), key.kind.trim()).await?;
    tracing::info!(name = %key.name, kind = %key.kind, "Menu item deleted");
    Ok(Json(true))
}

/// POST /api/menu/seed - 重置为默认菜单
pub async fn seed(State(state): State<ServerState>) -> AppResult<Json<SeedResponse>> {
    let inserted = menu::seed_defaults(state.pool()).await?;
    Ok(Json(SeedResponse { inserted }))
}
