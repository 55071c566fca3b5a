//! Stock Preset Repository

use shared::error::ErrorCode;
use shared::models::{StockPreset, StockPresetApplied, StockPresetCreate, StockPresetItem};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write, inventory};

fn not_found(id: i64) -> RepoError {
    RepoError::NotFound(
        ErrorCode::StockPresetNotFound,
        format!("Stock preset {} not found", id),
    )
}

async fn load_items(conn: &mut SqliteConnection, preset_id: i64) -> RepoResult<Vec<StockPresetItem>> {
    let items = sqlx::query_as::<_, StockPresetItem>(
        "SELECT name, quantity, unit FROM stock_preset_item WHERE preset_id = ? ORDER BY position",
    )
    .bind(preset_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<StockPreset>> {
    let preset = sqlx::query_as::<_, StockPreset>(
        "SELECT id, name, description, created_at FROM stock_preset WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    let Some(mut preset) = preset else {
        return Ok(None);
    };
    preset.items = load_items(conn, id).await?;
    Ok(Some(preset))
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<StockPreset>> {
    let mut conn = pool.acquire().await?;
    let mut presets = sqlx::query_as::<_, StockPreset>(
        "SELECT id, name, description, created_at FROM stock_preset ORDER BY name",
    )
    .fetch_all(&mut *conn)
    .await?;
    for preset in &mut presets {
        preset.items = load_items(&mut conn, preset.id).await?;
    }
    Ok(presets)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<StockPreset>> {
    let mut conn = pool.acquire().await?;
    fetch(&mut conn, id).await
}

/// Create a preset with at least one item
pub async fn create(pool: &SqlitePool, data: StockPresetCreate, now: i64) -> RepoResult<StockPreset> {
    if data.items.is_empty() {
        return Err(RepoError::Validation(
            "a stock preset needs at least one item".into(),
        ));
    }
    for item in &data.items {
        if item.name.trim().is_empty() {
            return Err(RepoError::Validation("item name is required".into()));
        }
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(RepoError::Validation(format!(
                "quantity of {} must be greater than zero",
                item.name
            )));
        }
    }
    let name = data.name.trim();

    let mut tx = begin_write(pool).await?;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO stock_preset (name, description, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(&data.description)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Rejected(ErrorCode::AlreadyExists, _) => RepoError::Rejected(
            ErrorCode::StockPresetNameExists,
            format!("Stock preset '{}' already exists", name),
        ),
        other => other,
    })?;

    for (position, item) in data.items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO stock_preset_item (preset_id, position, name, quantity, unit) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(position as i64)
        .bind(item.name.trim())
        .bind(item.quantity)
        .bind(item.unit.trim())
        .execute(&mut *tx)
        .await?;
    }
    let created = fetch(&mut tx, id).await?;
    tx.commit().await?;

    created.ok_or_else(|| RepoError::Database("Failed to create stock preset".to_string()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM stock_preset WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Restock every ingredient of a preset in one transaction
pub async fn apply(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<StockPresetApplied> {
    let mut tx = begin_write(pool).await?;
    let preset = fetch(&mut tx, id).await?.ok_or_else(|| not_found(id))?;

    let mut created = Vec::new();
    let mut restocked = Vec::new();
    for item in &preset.items {
        let (_, is_new) =
            inventory::upsert(&mut tx, &item.name, item.quantity, &item.unit, None, now).await?;
        if is_new {
            created.push(item.name.clone());
        } else {
            restocked.push(item.name.clone());
        }
    }
    tx.commit().await?;

    tracing::info!(
        preset_id = id,
        preset = %preset.name,
        created = created.len(),
        restocked = restocked.len(),
        "Stock preset applied"
    );
    Ok(StockPresetApplied {
        preset_id: id,
        preset_name: preset.name,
        created,
        restocked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn weekly() -> StockPresetCreate {
        StockPresetCreate {
            name: "Pedido semanal".into(),
            description: None,
            items: vec![
                StockPresetItem {
                    name: "Tortilla".into(),
                    quantity: 100.0,
                    unit: "unit".into(),
                },
                StockPresetItem {
                    name: "Queso".into(),
                    quantity: 2.5,
                    unit: "kg".into(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_create_keeps_item_order() {
        let pool = test_pool().await;
        let preset = create(&pool, weekly(), 1).await.unwrap();
        assert_eq!(preset.items[0].name, "Tortilla");
        assert_eq!(preset.items[1].quantity, 2.5);

        let err = create(&pool, weekly(), 2).await.unwrap_err();
        assert!(matches!(err, RepoError::Rejected(ErrorCode::StockPresetNameExists, _)));

        let mut empty = weekly();
        empty.name = "Vacío".into();
        empty.items.clear();
        assert!(matches!(create(&pool, empty, 3).await.unwrap_err(), RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_apply_creates_and_restocks() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO inventory_item (name, quantity, unit, min_alert_quantity, created_at, updated_at) \
             VALUES ('Queso', 1.0, 'kg', 0.5, 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        let preset = create(&pool, weekly(), 1).await.unwrap();

        let applied = apply(&pool, preset.id, 10).await.unwrap();
        assert_eq!(applied.created, vec!["Tortilla"]);
        assert_eq!(applied.restocked, vec!["Queso"]);

        let (quantity, threshold): (f64, f64) = sqlx::query_as(
            "SELECT quantity, min_alert_quantity FROM inventory_item WHERE name = 'Queso'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(quantity, 3.5);
        // Existing threshold is kept
        assert_eq!(threshold, 0.5);

        let err = apply(&pool, 999, 10).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::StockPresetNotFound, _)));
    }

    #[tokio::test]
    async fn test_delete_removes_items() {
        let pool = test_pool().await;
        let preset = create(&pool, weekly(), 1).await.unwrap();
        delete(&pool, preset.id).await.unwrap();

        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_preset_item")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(items, 0);
        assert!(find_by_id(&pool, preset.id).await.unwrap().is_none());
    }
}
