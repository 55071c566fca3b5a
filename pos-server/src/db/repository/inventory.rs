//! Inventory Repository

use shared::error::ErrorCode;
use shared::models::{
    DEFAULT_MIN_ALERT_QUANTITY, InventoryItem, InventoryItemCreate, InventoryItemUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write};

const ITEM_COLUMNS: &str = "id, name, quantity, unit, min_alert_quantity, created_at, updated_at";

fn not_found(id: i64) -> RepoError {
    RepoError::NotFound(
        ErrorCode::IngredientNotFound,
        format!("Ingredient {} not found", id),
    )
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<InventoryItem>> {
    let items = sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM inventory_item ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM inventory_item WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

/// Ingredients at or below their alert threshold, scarcest first
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<InventoryItem>> {
    let items = sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM inventory_item WHERE quantity <= min_alert_quantity \
         ORDER BY quantity - min_alert_quantity, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Insert an ingredient or add `quantity` to the one with the same name
///
/// A `min_alert_quantity` of `None` keeps the existing threshold (or the
/// default for a new ingredient). Returns `(id, created)`.
pub async fn upsert(
    conn: &mut SqliteConnection,
    name: &str,
    quantity: f64,
    unit: &str,
    min_alert_quantity: Option<f64>,
    now: i64,
) -> RepoResult<(i64, bool)> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM inventory_item WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(id) = existing {
        sqlx::query(
            r#"
            UPDATE inventory_item
            SET quantity = ROUND(quantity + ?, 6), unit = ?,
                min_alert_quantity = COALESCE(?, min_alert_quantity), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(quantity)
        .bind(unit)
        .bind(min_alert_quantity)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
        return Ok((id, false));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO inventory_item (name, quantity, unit, min_alert_quantity, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(quantity)
    .bind(unit)
    .bind(min_alert_quantity.unwrap_or(DEFAULT_MIN_ALERT_QUANTITY))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok((id, true))
}

/// Add a new ingredient or restock an existing one; returns the item and whether it was created
pub async fn add_or_restock(
    pool: &SqlitePool,
    data: InventoryItemCreate,
    now: i64,
) -> RepoResult<(InventoryItem, bool)> {
    let mut tx = begin_write(pool).await?;
    let (id, created) = upsert(
        &mut tx,
        data.name.trim(),
        data.quantity,
        data.unit.trim(),
        Some(data.min_alert_quantity),
        now,
    )
    .await?;
    tx.commit().await?;

    let item = find_by_id(pool, id).await?.ok_or_else(|| not_found(id))?;
    Ok((item, created))
}

/// Set absolute quantity, unit and alert threshold
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: InventoryItemUpdate,
    now: i64,
) -> RepoResult<InventoryItem> {
    let result = sqlx::query(
        "UPDATE inventory_item SET quantity = ?, unit = ?, min_alert_quantity = ?, updated_at = ? WHERE id = ?",
    )
    .bind(data.quantity)
    .bind(data.unit.trim())
    .bind(data.min_alert_quantity)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Delete an ingredient no recipe uses
///
/// The usage check and the delete share one write transaction, so a recipe
/// saved in between cannot leave a dangling reference.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;
    let dishes: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT r.dish_name FROM recipe_ingredient ri
        JOIN recipe r ON r.id = ri.recipe_id
        WHERE ri.ingredient_id = ?
        ORDER BY r.dish_name
        "#,
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;
    if !dishes.is_empty() {
        return Err(RepoError::Rejected(
            ErrorCode::IngredientInUse,
            format!("Ingredient {} is used by: {}", id, dishes.join(", ")),
        ));
    }

    let result = sqlx::query("DELETE FROM inventory_item WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn ingredient(name: &str, quantity: f64, min_alert_quantity: f64) -> InventoryItemCreate {
        InventoryItemCreate {
            name: name.to_string(),
            quantity,
            unit: "kg".to_string(),
            min_alert_quantity,
        }
    }

    #[tokio::test]
    async fn test_add_then_restock_by_name() {
        let pool = test_pool().await;
        let (item, created) = add_or_restock(&pool, ingredient("Queso", 2.0, 1.0), 10)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(item.quantity, 2.0);

        let (item, created) = add_or_restock(&pool, ingredient("Queso", 3.5, 2.0), 20)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(item.quantity, 5.5);
        assert_eq!(item.min_alert_quantity, 2.0);
        assert_eq!(item.created_at, 10);
        assert_eq!(item.updated_at, 20);
        assert_eq!(find_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fractional_restocks_add_up_exactly() {
        let pool = test_pool().await;
        for _ in 0..3 {
            add_or_restock(&pool, ingredient("Queso", 0.1, 1.0), 0).await.unwrap();
        }
        let item = find_all(&pool).await.unwrap().remove(0);
        assert_eq!(item.quantity, 0.3);
    }

    #[tokio::test]
    async fn test_low_stock_includes_threshold() {
        let pool = test_pool().await;
        add_or_restock(&pool, ingredient("Queso", 1.0, 1.0), 0).await.unwrap();
        add_or_restock(&pool, ingredient("Arroz", 0.2, 1.0), 0).await.unwrap();
        add_or_restock(&pool, ingredient("Frijol", 9.0, 1.0), 0).await.unwrap();

        let low: Vec<String> = find_low_stock(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(low, vec!["Arroz", "Queso"]);
    }

    #[tokio::test]
    async fn test_update_sets_absolute_values() {
        let pool = test_pool().await;
        let (item, _) = add_or_restock(&pool, ingredient("Queso", 4.0, 1.0), 0).await.unwrap();

        let updated = update(
            &pool,
            item.id,
            InventoryItemUpdate {
                quantity: 1.5,
                unit: "g".into(),
                min_alert_quantity: 0.5,
            },
            5,
        )
        .await
        .unwrap();
        assert_eq!(updated.quantity, 1.5);
        assert_eq!(updated.unit, "g");

        let err = update(
            &pool,
            999,
            InventoryItemUpdate {
                quantity: 1.0,
                unit: "g".into(),
                min_alert_quantity: 0.5,
            },
            5,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::IngredientNotFound, _)));
    }

    #[tokio::test]
    async fn test_negative_quantity_violates_schema() {
        let pool = test_pool().await;
        let (item, _) = add_or_restock(&pool, ingredient("Queso", 4.0, 1.0), 0).await.unwrap();
        let err = update(
            &pool,
            item.id,
            InventoryItemUpdate {
                quantity: -1.0,
                unit: "kg".into(),
                min_alert_quantity: 1.0,
            },
            5,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_refuses_ingredient_used_by_recipe() {
        let pool = test_pool().await;
        let (queso, _) = add_or_restock(&pool, ingredient("Queso", 4.0, 1.0), 0).await.unwrap();
        let (sal, _) = add_or_restock(&pool, ingredient("Sal", 4.0, 1.0), 0).await.unwrap();
        let recipe_id: i64 = sqlx::query_scalar(
            "INSERT INTO recipe (dish_name, created_at, updated_at) VALUES ('Quesadilla', 0, 0) RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, quantity_needed, unit) VALUES (?, ?, 0.1, 'kg')",
        )
        .bind(recipe_id)
        .bind(queso.id)
        .execute(&pool)
        .await
        .unwrap();

        let err = delete(&pool, queso.id).await.unwrap_err();
        match err {
            RepoError::Rejected(ErrorCode::IngredientInUse, msg) => assert!(msg.contains("Quesadilla")),
            other => panic!("unexpected error: {other:?}"),
        }

        delete(&pool, sal.id).await.unwrap();
        let err = delete(&pool, sal.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::IngredientNotFound, _)));
    }
}
