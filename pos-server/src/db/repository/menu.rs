//! Menu Repository

use shared::error::ErrorCode;
use shared::models::{MenuItem, MenuItemCreate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, begin_write};

/// Menu loaded by `seed_defaults`: (name, price, kind)
pub const DEFAULT_MENU: &[(&str, f64, &str)] = &[
    ("Guacamole", 85.0, "Entrada"),
    ("Sopa de Tortilla", 70.0, "Entrada"),
    ("Tacos al Pastor", 95.0, "Plato Fuerte"),
    ("Enchiladas Verdes", 110.0, "Plato Fuerte"),
    ("Quesadilla", 60.0, "Plato Fuerte"),
    ("Chilaquiles", 90.0, "Plato Fuerte"),
    ("Flan", 45.0, "Postre"),
    ("Churros", 50.0, "Postre"),
    ("Agua de Horchata", 35.0, "Bebida"),
    ("Refresco", 30.0, "Bebida"),
    ("Café de Olla", 40.0, "Bebida"),
];

/// Find all menu items, grouped by kind
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(
        "SELECT id, name, price, kind FROM menu_item ORDER BY kind, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>("SELECT id, name, price, kind FROM menu_item WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Create a new menu item
pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let name = data.name.trim();
    let kind = data.kind.trim();

    let id: i64 = sqlx::query_scalar("INSERT INTO menu_item (name, price, kind) VALUES (?, ?, ?) RETURNING id")
        .bind(name)
        .bind(data.price)
        .bind(kind)
        .fetch_one(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Rejected(ErrorCode::AlreadyExists, _) => RepoError::Rejected(
                ErrorCode::MenuItemExists,
                format!("Menu item '{}' ({}) already exists", name, kind),
            ),
            other => other,
        })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
}

/// Delete a menu item by `(name, kind)`
pub async fn delete(pool: &SqlitePool, name: &str, kind: &str) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM menu_item WHERE name = ? AND kind = ?")
        .bind(name)
        .bind(kind)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(
            ErrorCode::MenuItemNotFound,
            format!("Menu item '{}' ({}) not found", name, kind),
        ));
    }
    Ok(())
}

/// Replace the whole menu with [`DEFAULT_MENU`]; returns the number of items inserted
pub async fn seed_defaults(pool: &SqlitePool) -> RepoResult<usize> {
    let mut tx = begin_write(pool).await?;
    let removed = sqlx::query("DELETE FROM menu_item").execute(&mut *tx).await?;
    for (name, price, kind) in DEFAULT_MENU {
        sqlx::query("INSERT INTO menu_item (name, price, kind) VALUES (?, ?, ?)")
            .bind(*name)
            .bind(*price)
            .bind(*kind)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(
        removed = removed.rows_affected(),
        inserted = DEFAULT_MENU.len(),
        "Menu reset to defaults"
    );
    Ok(DEFAULT_MENU.len())
}
