//! Recipe Repository
//!
//! Recipes are keyed by dish name. The lookup used when ordering lives in
//! [`super::stock::load_recipe_lines`].

use std::collections::HashSet;

use shared::error::ErrorCode;
use shared::models::{Recipe, RecipeCreate, RecipeIngredient, RecipeIngredientInput, RecipeUpdate};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write};

const RECIPE_COLUMNS: &str = "id, dish_name, description, instructions, created_at, updated_at";

fn not_found(dish: &str) -> RepoError {
    RepoError::NotFound(
        ErrorCode::RecipeNotFound,
        format!("Recipe for '{}' not found", dish),
    )
}

async fn load_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> RepoResult<Vec<RecipeIngredient>> {
    let lines = sqlx::query_as::<_, RecipeIngredient>(
        r#"
        SELECT ri.ingredient_id, i.name AS ingredient_name, ri.quantity_needed, ri.unit
        FROM recipe_ingredient ri
        JOIN inventory_item i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ?
        ORDER BY ri.id
        "#,
    )
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(lines)
}

async fn fetch_by_dish(conn: &mut SqliteConnection, dish: &str) -> RepoResult<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipe WHERE dish_name = ?"
    ))
    .bind(dish)
    .fetch_optional(&mut *conn)
    .await?;
    let Some(mut recipe) = recipe else {
        return Ok(None);
    };
    recipe.ingredients = load_ingredients(conn, recipe.id).await?;
    Ok(Some(recipe))
}

async fn ensure_dish_on_menu(conn: &mut SqliteConnection, dish: &str) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_item WHERE name = ?")
        .bind(dish)
        .fetch_one(&mut *conn)
        .await?;
    if count == 0 {
        return Err(RepoError::NotFound(
            ErrorCode::MenuItemNotFound,
            format!("Dish '{}' is not on the menu", dish),
        ));
    }
    Ok(())
}

/// Every ingredient must exist, appear once and have a positive quantity
async fn validate_lines(
    conn: &mut SqliteConnection,
    lines: &[RecipeIngredientInput],
) -> RepoResult<()> {
    let mut seen = HashSet::new();
    for line in lines {
        if !line.quantity_needed.is_finite() || line.quantity_needed <= 0.0 {
            return Err(RepoError::Validation(format!(
                "quantity_needed for ingredient {} must be greater than zero",
                line.ingredient_id
            )));
        }
        if !seen.insert(line.ingredient_id) {
            return Err(RepoError::Validation(format!(
                "ingredient {} is listed more than once",
                line.ingredient_id
            )));
        }
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM inventory_item WHERE id = ?")
            .bind(line.ingredient_id)
            .fetch_optional(&mut *conn)
            .await?;
        if exists.is_none() {
            return Err(RepoError::NotFound(
                ErrorCode::IngredientNotFound,
                format!("Ingredient {} not found", line.ingredient_id),
            ));
        }
    }
    Ok(())
}

async fn insert_lines(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    lines: &[RecipeIngredientInput],
) -> RepoResult<()> {
    for line in lines {
        sqlx::query(
            "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, quantity_needed, unit) VALUES (?, ?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(line.ingredient_id)
        .bind(line.quantity_needed)
        .bind(line.unit.trim())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn map_duplicate(err: sqlx::Error, dish: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Rejected(ErrorCode::AlreadyExists, _) => RepoError::Rejected(
            ErrorCode::RecipeAlreadyExists,
            format!("Recipe for '{}' already exists", dish),
        ),
        other => other,
    }
}

/// All recipes with their ingredient lines
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Recipe>> {
    let mut conn = pool.acquire().await?;
    let mut recipes = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipe ORDER BY dish_name"
    ))
    .fetch_all(&mut *conn)
    .await?;
    for recipe in &mut recipes {
        recipe.ingredients = load_ingredients(&mut conn, recipe.id).await?;
    }
    Ok(recipes)
}

pub async fn find_by_dish(pool: &SqlitePool, dish: &str) -> RepoResult<Option<Recipe>> {
    let mut conn = pool.acquire().await?;
    fetch_by_dish(&mut conn, dish).await
}

/// Create the recipe of a menu dish
pub async fn create(pool: &SqlitePool, data: RecipeCreate, now: i64) -> RepoResult<Recipe> {
    let dish = data.dish_name.trim();

    let mut tx = begin_write(pool).await?;
    ensure_dish_on_menu(&mut tx, dish).await?;
    validate_lines(&mut tx, &data.ingredients).await?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO recipe (dish_name, description, instructions, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(dish)
    .bind(&data.description)
    .bind(&data.instructions)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_duplicate(e, dish))?;

    insert_lines(&mut tx, id, &data.ingredients).await?;
    let created = fetch_by_dish(&mut tx, dish).await?;
    tx.commit().await?;

    tracing::debug!(recipe_id = id, dish = %dish, lines = data.ingredients.len(), "Recipe created");
    created.ok_or_else(|| RepoError::Database("Failed to create recipe".to_string()))
}

/// Update a recipe; a new ingredient list replaces the old one
pub async fn update(
    pool: &SqlitePool,
    dish: &str,
    data: RecipeUpdate,
    now: i64,
) -> RepoResult<Recipe> {
    let mut tx = begin_write(pool).await?;
    let current = fetch_by_dish(&mut tx, dish)
        .await?
        .ok_or_else(|| not_found(dish))?;

    let new_dish = data
        .dish_name
        .as_deref()
        .map(str::trim)
        .unwrap_or(current.dish_name.as_str())
        .to_string();
    if new_dish != current.dish_name {
        ensure_dish_on_menu(&mut tx, &new_dish).await?;
    }

    sqlx::query(
        r#"
        UPDATE recipe
        SET dish_name = ?, description = COALESCE(?, description),
            instructions = COALESCE(?, instructions), updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&new_dish)
    .bind(&data.description)
    .bind(&data.instructions)
    .bind(now)
    .bind(current.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_duplicate(e, &new_dish))?;

    if let Some(lines) = &data.ingredients {
        validate_lines(&mut tx, lines).await?;
        sqlx::query("DELETE FROM recipe_ingredient WHERE recipe_id = ?")
            .bind(current.id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, current.id, lines).await?;
    }

    let updated = fetch_by_dish(&mut tx, &new_dish).await?;
    tx.commit().await?;
    updated.ok_or_else(|| not_found(&new_dish))
}

/// Delete a recipe and its lines
pub async fn delete(pool: &SqlitePool, dish: &str) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM recipe WHERE dish_name = ?")
        .bind(dish)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(dish));
    }
    Ok(())
}
