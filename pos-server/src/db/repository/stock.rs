//! Stock movements inside an open transaction
//!
//! Callers pass the connection of a [`super::begin_write`] transaction so that
//! the check, the order write and the deductions commit or roll back together.

use std::collections::HashMap;

use shared::error::ErrorCode;
use sqlx::SqliteConnection;

use super::{RepoError, RepoResult};
use crate::orders::stock::{QUANTITY_SCALE, RecipeLine, StockPlan, quantity, quantity_f64};

#[derive(sqlx::FromRow)]
struct RecipeLineRow {
    ingredient_id: i64,
    ingredient_name: String,
    quantity_needed: f64,
    available: f64,
}

/// Recipe lines (with current stock) for each dish name that has a recipe
pub async fn load_recipe_lines(
    conn: &mut SqliteConnection,
    dishes: &[&str],
) -> RepoResult<HashMap<String, Vec<RecipeLine>>> {
    let mut recipes = HashMap::new();
    for dish in dishes {
        let rows = sqlx::query_as::<_, RecipeLineRow>(
            "SELECT ri.ingredient_id, i.name AS ingredient_name, ri.quantity_needed, i.quantity AS available \
             FROM recipe r \
             JOIN recipe_ingredient ri ON ri.recipe_id = r.id \
             JOIN inventory_item i ON i.id = ri.ingredient_id \
             WHERE r.dish_name = ? ORDER BY ri.id",
        )
        .bind(*dish)
        .fetch_all(&mut *conn)
        .await?;
        if rows.is_empty() {
            continue;
        }
        let lines = rows
            .into_iter()
            .map(|r| RecipeLine {
                ingredient_id: r.ingredient_id,
                ingredient_name: r.ingredient_name,
                quantity_needed: quantity(r.quantity_needed),
                available: quantity(r.available),
            })
            .collect();
        recipes.insert((*dish).to_string(), lines);
    }
    Ok(recipes)
}

/// Check a change in dish counts against stock and apply it
///
/// Positive counts consume stock, negative counts return it. Nothing is
/// written when any ingredient falls short.
pub async fn reserve(
    conn: &mut SqliteConnection,
    counts: &[(String, i64)],
    now: i64,
) -> RepoResult<StockPlan> {
    let dishes: Vec<&str> = counts.iter().map(|(name, _)| name.as_str()).collect();
    let recipes = load_recipe_lines(conn, &dishes).await?;
    let plan = StockPlan::build(counts, &recipes);
    plan.check().map_err(RepoError::InsufficientStock)?;
    apply(conn, &plan, now).await?;
    Ok(plan)
}

/// Write a checked plan
///
/// Stored quantities are rounded to the same scale as the plan. Deductions
/// are guarded by `quantity >= required`: a concurrent writer that consumed
/// the stock after the check turns into a shortage, not a negative quantity.
async fn apply(conn: &mut SqliteConnection, plan: &StockPlan, now: i64) -> RepoResult<()> {
    for need in &plan.needs {
        let required = quantity_f64(need.required);
        if need.required.is_sign_positive() {
            let rows = sqlx::query(
                "UPDATE inventory_item SET quantity = ROUND(quantity - ?1, ?4), updated_at = ?2 \
                 WHERE id = ?3 AND ROUND(quantity, ?4) >= ?1",
            )
            .bind(required)
            .bind(now)
            .bind(need.ingredient_id)
            .bind(QUANTITY_SCALE as i64)
            .execute(&mut *conn)
            .await?;
            if rows.rows_affected() == 0 {
                let available: Option<f64> =
                    sqlx::query_scalar("SELECT quantity FROM inventory_item WHERE id = ?")
                        .bind(need.ingredient_id)
                        .fetch_optional(&mut *conn)
                        .await?;
                let Some(available) = available else {
                    return Err(RepoError::NotFound(
                        ErrorCode::IngredientNotFound,
                        format!("Ingredient {} not found", need.ingredient_name),
                    ));
                };
                return Err(RepoError::InsufficientStock(StockPlan::shortage(need, available)));
            }
        } else {
            sqlx::query(
                "UPDATE inventory_item SET quantity = ROUND(quantity + ?1, ?4), updated_at = ?2 WHERE id = ?3",
            )
            .bind(-required)
            .bind(now)
            .bind(need.ingredient_id)
            .bind(QUANTITY_SCALE as i64)
            .execute(&mut *conn)
            .await?;
        }
    }
    if !plan.is_empty() {
        tracing::debug!(ingredients = plan.needs.len(), "Stock movements applied");
    }
    Ok(())
}
