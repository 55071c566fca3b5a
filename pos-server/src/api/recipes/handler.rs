//! Recipe API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::recipe;
use crate::utils::validation::{
    MAX_INSTRUCTIONS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_positive, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Recipe, RecipeCreate, RecipeIngredientInput, RecipeUpdate};
use shared::util::now_millis;

fn validate_lines(lines: &[RecipeIngredientInput]) -> AppResult<()> {
    for line in lines {
        validate_positive(line.quantity_needed, "quantity_needed")?;
        validate_required_text(&line.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

/// GET /api/recipes - 获取所有配方
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Recipe>>> {
    let recipes = recipe::find_all(state.pool()).await?;
    Ok(Json(recipes))
}

/// GET /api/recipes/:dish - 按菜名获取配方
pub async fn get_by_dish(
    State(state): State<ServerState>,
    Path(dish): Path<String>,
) -> AppResult<Json<Recipe>> {
    let found = recipe::find_by_dish(state.pool(), &dish).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::RecipeNotFound,
            format!("Recipe for '{}' not found", dish),
        )
    })?;
    Ok(Json(found))
}

/// POST /api/recipes - 创建配方 (菜品必须在菜单中)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RecipeCreate>,
) -> AppResult<Json<Recipe>> {
    validate_required_text(&payload.dish_name, "dish_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.instructions, "instructions", MAX_INSTRUCTIONS_LEN)?;
    validate_lines(&payload.ingredients)?;

    let created = recipe::create(state.pool(), payload, now_millis()).await?;
    tracing::info!(
        id = created.id,
        dish = %created.dish_name,
        ingredients = created.ingredients.len(),
        "Recipe created"
    );
    Ok(Json(created))
}

/// PUT /api/recipes/:dish - 修改配方 (提供 ingredients 时整体替换)
pub async fn update(
    State(state): State<ServerState>,
    Path(dish): Path<String>,
    Json(payload): Json<RecipeUpdate>,
) -> AppResult<Json<Recipe>> {
    if let Some(name) = &payload.dish_name {
        validate_required_text(name, "dish_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.instructions, "instructions", MAX_INSTRUCTIONS_LEN)?;
    if let Some(lines) = &payload.ingredients {
        validate_lines(lines)?;
    }

    let updated = recipe::update(state.pool(), &dish, payload, now_millis()).await?;
    tracing::info!(dish = %updated.dish_name, "Recipe updated");
    Ok(Json(updated))
}

/// DELETE /api/recipes/:dish - 删除配方
pub async fn delete(
    State(state): State<ServerState>,
    Path(dish): Path<String>,
) -> AppResult<Json<bool>> {
    recipe::delete(state.pool(), &dish).await?;
    tracing::info!(dish = %dish, "Recipe deleted");
    Ok(Json(true))
}
