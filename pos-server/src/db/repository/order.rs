//! Order Repository
//!
//! Every write that changes the items of an order reconciles inventory in
//! the same transaction as the order rows.

use shared::error::ErrorCode;
use shared::models::{
    DIGITAL_TABLE, DelayedOrder, Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate,
};
use shared::util::minutes_between;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write, stock};
use crate::orders::status::{self, KitchenStamps};
use crate::orders::stock::{count_items, diff_counts, negate};

const ORDER_COLUMNS: &str = "id, table_number, app_number, status, notes, created_at, updated_at, \
     kitchen_started_at, kitchen_finished_at";

#[derive(sqlx::FromRow)]
struct DelayedRow {
    id: i64,
    table_number: i64,
    status: OrderStatus,
    created_at: i64,
    item_count: i64,
}

fn not_found(id: i64) -> RepoError {
    RepoError::NotFound(ErrorCode::OrderNotFound, format!("Order {} not found", id))
}

fn already_paid(id: i64) -> RepoError {
    RepoError::Rejected(
        ErrorCode::OrderAlreadyPaid,
        format!("Order {} is already paid", id),
    )
}

fn stamps_of(order: &Order) -> KitchenStamps {
    KitchenStamps {
        started_at: order.kitchen_started_at,
        finished_at: order.kitchen_finished_at,
    }
}

async fn fetch_row(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(order)
}

async fn load_items(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT name, price, kind FROM order_item WHERE order_id = ? ORDER BY position",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}

async fn insert_items(
    conn: &mut SqliteConnection,
    order_id: i64,
    items: &[OrderItem],
) -> RepoResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_item (order_id, position, name, price, kind) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(position as i64)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.kind)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Only existing tables and the digital table accept orders
async fn ensure_table(conn: &mut SqliteConnection, table_number: i64) -> RepoResult<()> {
    if table_number == DIGITAL_TABLE {
        return Ok(());
    }
    let found: Option<i64> = sqlx::query_scalar("SELECT number FROM dining_table WHERE number = ?")
        .bind(table_number)
        .fetch_optional(&mut *conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::NotFound(
            ErrorCode::TableNotFound,
            format!("Table {} not found", table_number),
        )),
    }
}

async fn next_app_number(conn: &mut SqliteConnection) -> RepoResult<i64> {
    let next: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(app_number), 0) + 1 FROM orders WHERE table_number = ?",
    )
    .bind(DIGITAL_TABLE)
    .fetch_one(&mut *conn)
    .await?;
    Ok(next)
}

fn validate_items(items: &[OrderItem]) -> RepoResult<()> {
    for item in items {
        if item.name.trim().is_empty() {
            return Err(RepoError::Validation("item name is required".into()));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(RepoError::Validation(format!(
                "item {} has an invalid price",
                item.name
            )));
        }
    }
    Ok(())
}

fn with_items(mut order: Order, items: Vec<OrderItem>) -> Order {
    order.items = items;
    order.kitchen_minutes = match (order.kitchen_started_at, order.kitchen_finished_at) {
        (Some(start), Some(end)) => minutes_between(start, end),
        _ => None,
    };
    order
}

/// Find order by id, with its items
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let mut conn = pool.acquire().await?;
    let Some(order) = fetch_row(&mut conn, id).await? else {
        return Ok(None);
    };
    let items = load_items(&mut conn, id).await?;
    Ok(Some(with_items(order, items)))
}

/// Orders in the given statuses, newest first
pub async fn find_by_statuses(
    pool: &SqlitePool,
    statuses: &[OrderStatus],
) -> RepoResult<Vec<Order>> {
    let mut conn = pool.acquire().await?;
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE status IN ({}) ORDER BY created_at DESC, id DESC",
        OrderStatus::sql_list(statuses)
    ))
    .fetch_all(&mut *conn)
    .await?;

    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        let items = load_items(&mut conn, order.id).await?;
        result.push(with_items(order, items));
    }
    Ok(result)
}

/// Orders the kitchen is working on
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    find_by_statuses(pool, &OrderStatus::KITCHEN_ACTIVE).await
}

/// Non-empty orders still waiting on the kitchen after `threshold_minutes`
pub async fn find_delayed(
    pool: &SqlitePool,
    now: i64,
    threshold_minutes: i64,
) -> RepoResult<Vec<DelayedOrder>> {
    let cutoff = now - threshold_minutes * 60_000;
    let rows = sqlx::query_as::<_, DelayedRow>(&format!(
        r#"
        SELECT o.id, o.table_number, o.status, o.created_at, COUNT(oi.id) AS item_count
        FROM orders o
        JOIN order_item oi ON oi.order_id = o.id
        WHERE o.status IN ({}) AND o.created_at <= ?
        GROUP BY o.id
        ORDER BY o.created_at, o.id
        "#,
        OrderStatus::sql_list(&OrderStatus::DELAY_WATCHED)
    ))
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| DelayedOrder {
            order_id: r.id,
            table_number: r.table_number,
            status: r.status,
            item_count: r.item_count as usize,
            created_at: r.created_at,
            minutes_waiting: minutes_between(r.created_at, now).unwrap_or(0.0),
        })
        .collect())
}

/// Create an order, deducting the recipe ingredients of its items
///
/// Fails with `InsufficientStock` without writing anything when any
/// ingredient cannot cover the whole order.
pub async fn create(pool: &SqlitePool, data: OrderCreate, now: i64) -> RepoResult<Order> {
    validate_items(&data.items)?;
    let stamps = status::transition(OrderStatus::TakingOrder, data.status, KitchenStamps::default(), now)
        .unwrap_or_default();

    let mut tx = begin_write(pool).await?;
    ensure_table(&mut tx, data.table_number).await?;
    stock::reserve(&mut tx, &count_items(&data.items), now).await?;

    let app_number = if data.table_number == DIGITAL_TABLE {
        Some(next_app_number(&mut tx).await?)
    } else {
        None
    };

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO orders (table_number, app_number, status, notes, created_at, updated_at,
                            kitchen_started_at, kitchen_finished_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(data.table_number)
    .bind(app_number)
    .bind(data.status)
    .bind(&data.notes)
    .bind(now)
    .bind(now)
    .bind(stamps.started_at)
    .bind(stamps.finished_at)
    .fetch_one(&mut *tx)
    .await?;

    insert_items(&mut tx, id, &data.items).await?;
    tx.commit().await?;

    tracing::debug!(order_id = id, table = data.table_number, items = data.items.len(), "Order created");

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
}

/// Replace table, items, status and notes of an order
///
/// Inventory moves by the difference between the old and new items. Items
/// taken off an order the kitchen already started are not returned.
pub async fn replace(pool: &SqlitePool, id: i64, data: OrderUpdate, now: i64) -> RepoResult<Order> {
    validate_items(&data.items)?;

    let mut tx = begin_write(pool).await?;
    let current = fetch_row(&mut tx, id).await?.ok_or_else(|| not_found(id))?;
    if current.status.is_terminal() {
        return Err(already_paid(id));
    }
    ensure_table(&mut tx, data.table_number).await?;

    let old_items = load_items(&mut tx, id).await?;
    let mut delta = diff_counts(&old_items, &data.items);
    if !status::stock_returnable(current.status, stamps_of(&current)) {
        delta.retain(|(_, n)| *n > 0);
    }
    stock::reserve(&mut tx, &delta, now).await?;

    let stamps = status::transition(current.status, data.status, stamps_of(&current), now)
        .map_err(|_| already_paid(id))?;

    let app_number = match (data.table_number == DIGITAL_TABLE, current.app_number) {
        (true, Some(n)) => Some(n),
        (true, None) => Some(next_app_number(&mut tx).await?),
        (false, _) => None,
    };

    sqlx::query(
        r#"
        UPDATE orders
        SET table_number = ?, app_number = ?, status = ?, notes = ?, updated_at = ?,
            kitchen_started_at = ?, kitchen_finished_at = ?
        WHERE id = ?
        "#,
    )
    .bind(data.table_number)
    .bind(app_number)
    .bind(data.status)
    .bind(&data.notes)
    .bind(now)
    .bind(stamps.started_at)
    .bind(stamps.finished_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_items(&mut tx, id, &data.items).await?;
    tx.commit().await?;

    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Move an order to a new status, stamping kitchen start / finish
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    next: OrderStatus,
    now: i64,
) -> RepoResult<Order> {
    let mut tx = begin_write(pool).await?;
    let current = fetch_row(&mut tx, id).await?.ok_or_else(|| not_found(id))?;
    let stamps = status::transition(current.status, next, stamps_of(&current), now)
        .map_err(|_| already_paid(id))?;

    sqlx::query(
        r#"
        UPDATE orders
        SET status = ?, kitchen_started_at = ?, kitchen_finished_at = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(next)
    .bind(stamps.started_at)
    .bind(stamps.finished_at)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::debug!(order_id = id, from = %current.status, to = %next, "Order status changed");

    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Remove the most recently added item; returns the updated order and the removed item
pub async fn remove_last_item(
    pool: &SqlitePool,
    id: i64,
    now: i64,
) -> RepoResult<(Order, OrderItem)> {
    let mut tx = begin_write(pool).await?;
    let current = fetch_row(&mut tx, id).await?.ok_or_else(|| not_found(id))?;
    if current.status.is_terminal() {
        return Err(already_paid(id));
    }

    let last: Option<(i64, String, f64, String)> = sqlx::query_as(
        "SELECT id, name, price, kind FROM order_item WHERE order_id = ? ORDER BY position DESC LIMIT 1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some((item_id, name, price, kind)) = last else {
        return Err(RepoError::Rejected(
            ErrorCode::OrderEmpty,
            format!("Order {} has no items", id),
        ));
    };

    if status::stock_returnable(current.status, stamps_of(&current)) {
        stock::reserve(&mut tx, &[(name.clone(), -1)], now).await?;
    }

    sqlx::query("DELETE FROM order_item WHERE id = ?")
        .bind(item_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE orders SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    let order = find_by_id(pool, id).await?.ok_or_else(|| not_found(id))?;
    Ok((order, OrderItem { name, price, kind }))
}

/// Delete an order; returns `true` when its ingredients went back to stock
pub async fn delete(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let mut tx = begin_write(pool).await?;
    let current = fetch_row(&mut tx, id).await?.ok_or_else(|| not_found(id))?;

    let restock = status::stock_returnable(current.status, stamps_of(&current));
    if restock {
        let items = load_items(&mut tx, id).await?;
        stock::reserve(&mut tx, &negate(count_items(&items)), now).await?;
    }

    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::debug!(order_id = id, restocked = restock, "Order deleted");
    Ok(restock)
}
