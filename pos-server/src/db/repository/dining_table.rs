//! Dining Table Repository
//!
//! Occupied / reserved are derived on every read from orders and reservations.

use std::collections::{HashMap, HashSet};

use shared::error::ErrorCode;
use shared::models::{DIGITAL_TABLE, DiningTable, DiningTableCreate, OrderStatus, TableState};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, begin_write};

#[derive(sqlx::FromRow)]
struct UpcomingRow {
    table_number: i64,
    customer_name: String,
    starts_at: i64,
    ends_at: i64,
}

fn not_found(number: i64) -> RepoError {
    RepoError::NotFound(ErrorCode::TableNotFound, format!("Table {} not found", number))
}

/// Find all physical tables
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT number, capacity FROM dining_table ORDER BY number",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_number(pool: &SqlitePool, number: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT number, capacity FROM dining_table WHERE number = ?",
    )
    .bind(number)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

/// Table numbers that currently hold an unpaid order
async fn occupied_numbers(pool: &SqlitePool) -> RepoResult<HashSet<i64>> {
    let numbers: Vec<i64> = sqlx::query_scalar(&format!(
        "SELECT DISTINCT table_number FROM orders WHERE status IN ({})",
        OrderStatus::sql_list(&OrderStatus::TABLE_OCCUPYING)
    ))
    .fetch_all(pool)
    .await?;
    Ok(numbers.into_iter().collect())
}

/// All tables with derived state, followed by the digital table
///
/// For each table the current reservation (or else the next one starting
/// before `day_end`) is reported.
pub async fn find_all_with_state(
    pool: &SqlitePool,
    now: i64,
    day_end: i64,
) -> RepoResult<Vec<TableState>> {
    let tables = find_all(pool).await?;
    let occupied = occupied_numbers(pool).await?;

    let upcoming = sqlx::query_as::<_, UpcomingRow>(
        r#"
        SELECT r.table_number, c.name AS customer_name, r.starts_at, r.ends_at
        FROM reservation r
        JOIN customer c ON c.id = r.customer_id
        WHERE r.ends_at > ? AND r.starts_at < ?
        ORDER BY r.starts_at
        "#,
    )
    .bind(now)
    .bind(day_end)
    .fetch_all(pool)
    .await?;

    // Earliest first: the first row per table is the current or next one
    let mut next_by_table: HashMap<i64, UpcomingRow> = HashMap::new();
    for row in upcoming {
        next_by_table.entry(row.table_number).or_insert(row);
    }

    let mut states: Vec<TableState> = tables
        .into_iter()
        .map(|t| {
            let next = next_by_table.get(&t.number);
            TableState {
                number: t.number,
                capacity: t.capacity,
                occupied: occupied.contains(&t.number),
                reserved: next.is_some_and(|r| r.starts_at <= now && now < r.ends_at),
                is_virtual: false,
                reserved_customer_name: next.map(|r| r.customer_name.clone()),
                reserved_at: next.map(|r| r.starts_at),
            }
        })
        .collect();
    states.push(TableState::digital());
    Ok(states)
}

/// Physical tables free now and not reserved at `at`
pub async fn find_available_at(pool: &SqlitePool, at: i64) -> RepoResult<Vec<DiningTable>> {
    let occupied = occupied_numbers(pool).await?;
    let reserved: Vec<i64> = sqlx::query_scalar(
        "SELECT DISTINCT table_number FROM reservation WHERE starts_at <= ?1 AND ends_at > ?1",
    )
    .bind(at)
    .fetch_all(pool)
    .await?;

    Ok(find_all(pool)
        .await?
        .into_iter()
        .filter(|t| !occupied.contains(&t.number) && !reserved.contains(&t.number))
        .collect())
}

/// Create a new dining table
pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    if data.number < 1 || data.number == DIGITAL_TABLE {
        return Err(RepoError::Validation(format!(
            "table number must be >= 1 and not {}",
            DIGITAL_TABLE
        )));
    }
    if data.capacity < 1 {
        return Err(RepoError::Validation("capacity must be at least 1".into()));
    }

    sqlx::query("INSERT INTO dining_table (number, capacity) VALUES (?, ?)")
        .bind(data.number)
        .bind(data.capacity)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Rejected(ErrorCode::AlreadyExists, _) => RepoError::Rejected(
                ErrorCode::TableAlreadyExists,
                format!("Table {} already exists", data.number),
            ),
            other => other,
        })?;

    find_by_number(pool, data.number)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
}

/// Delete a table that no reservation or unpaid order refers to
pub async fn delete(pool: &SqlitePool, number: i64) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT number FROM dining_table WHERE number = ?")
        .bind(number)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(not_found(number));
    }

    let reservations: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reservation WHERE table_number = ?")
            .bind(number)
            .fetch_one(&mut *tx)
            .await?;
    if reservations > 0 {
        return Err(RepoError::Rejected(
            ErrorCode::TableHasReservations,
            format!("Table {} has {} reservation(s)", number, reservations),
        ));
    }

    let orders: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM orders WHERE table_number = ? AND status IN ({})",
        OrderStatus::sql_list(&OrderStatus::TABLE_OCCUPYING)
    ))
    .bind(number)
    .fetch_one(&mut *tx)
    .await?;
    if orders > 0 {
        return Err(RepoError::Rejected(
            ErrorCode::TableHasOrders,
            format!("Table {} has {} open order(s)", number, orders),
        ));
    }

    sqlx::query("DELETE FROM dining_table WHERE number = ?")
        .bind(number)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
