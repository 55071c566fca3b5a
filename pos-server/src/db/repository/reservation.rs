//! Reservation Repository
//!
//! A reservation holds its table over `[starts_at, ends_at)`; two
//! reservations on the same table may not overlap.

use shared::error::ErrorCode;
use shared::models::{
    DEFAULT_RESERVATION_MS, DIGITAL_TABLE, Reservation, ReservationCreate, ReservationUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write};

const SELECT_RESERVATION: &str = r#"
    SELECT r.id, r.table_number, r.customer_id, c.name AS customer_name, r.starts_at, r.ends_at
    FROM reservation r
    JOIN customer c ON c.id = r.customer_id
"#;

fn not_found(id: i64) -> RepoError {
    RepoError::NotFound(
        ErrorCode::ReservationNotFound,
        format!("Reservation {} not found", id),
    )
}

/// Reservations ordered by start, optionally limited to `[start, end)`
pub async fn find_all(pool: &SqlitePool, range: Option<(i64, i64)>) -> RepoResult<Vec<Reservation>> {
    let reservations = match range {
        Some((start, end)) => {
            sqlx::query_as::<_, Reservation>(&format!(
                "{SELECT_RESERVATION} WHERE r.starts_at >= ? AND r.starts_at < ? ORDER BY r.starts_at, r.id"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Reservation>(&format!(
                "{SELECT_RESERVATION} ORDER BY r.starts_at, r.id"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    Ok(reservations)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let mut conn = pool.acquire().await?;
    fetch(&mut conn, id).await
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Reservation>> {
    let reservation =
        sqlx::query_as::<_, Reservation>(&format!("{SELECT_RESERVATION} WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(reservation)
}

/// Table, customer and time window checks shared by create and update
async fn validate(
    conn: &mut SqliteConnection,
    table_number: i64,
    customer_id: i64,
    starts_at: i64,
    ends_at: i64,
    exclude_id: Option<i64>,
) -> RepoResult<()> {
    if ends_at <= starts_at {
        return Err(RepoError::Validation(
            "reservation must end after it starts".into(),
        ));
    }
    if table_number == DIGITAL_TABLE {
        return Err(RepoError::Validation(
            "the digital table cannot be reserved".into(),
        ));
    }

    let table: Option<i64> = sqlx::query_scalar("SELECT number FROM dining_table WHERE number = ?")
        .bind(table_number)
        .fetch_optional(&mut *conn)
        .await?;
    if table.is_none() {
        return Err(RepoError::NotFound(
            ErrorCode::TableNotFound,
            format!("Table {} not found", table_number),
        ));
    }

    let customer: Option<i64> = sqlx::query_scalar("SELECT id FROM customer WHERE id = ?")
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;
    if customer.is_none() {
        return Err(RepoError::NotFound(
            ErrorCode::CustomerNotFound,
            format!("Customer {} not found", customer_id),
        ));
    }

    let clash: Option<(i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT id, starts_at, ends_at FROM reservation
        WHERE table_number = ? AND starts_at < ? AND ends_at > ? AND id != ?
        ORDER BY starts_at
        LIMIT 1
        "#,
    )
    .bind(table_number)
    .bind(ends_at)
    .bind(starts_at)
    .bind(exclude_id.unwrap_or(0))
    .fetch_optional(&mut *conn)
    .await?;
    if let Some((other, other_start, other_end)) = clash {
        return Err(RepoError::Rejected(
            ErrorCode::ReservationConflict,
            format!(
                "Table {} is already reserved from {} to {} (reservation {})",
                table_number, other_start, other_end, other
            ),
        ));
    }
    Ok(())
}

fn end_after(starts_at: i64, duration: i64) -> RepoResult<i64> {
    starts_at
        .checked_add(duration)
        .ok_or_else(|| RepoError::Validation(format!("Start time {} is out of range", starts_at)))
}

/// Create a reservation (default duration one hour)
pub async fn create(pool: &SqlitePool, data: ReservationCreate) -> RepoResult<Reservation> {
    let ends_at = match data.ends_at {
        Some(ends_at) => ends_at,
        None => end_after(data.starts_at, DEFAULT_RESERVATION_MS)?,
    };

    let mut tx = begin_write(pool).await?;
    validate(
        &mut tx,
        data.table_number,
        data.customer_id,
        data.starts_at,
        ends_at,
        None,
    )
    .await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO reservation (table_number, customer_id, starts_at, ends_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(data.table_number)
    .bind(data.customer_id)
    .bind(data.starts_at)
    .bind(ends_at)
    .fetch_one(&mut *tx)
    .await?;
    let created = fetch(&mut tx, id).await?;
    tx.commit().await?;

    tracing::debug!(reservation_id = id, table = data.table_number, "Reservation created");
    created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
}

/// Patch a reservation
///
/// Moving the start without a new end keeps the previous duration.
pub async fn update(pool: &SqlitePool, id: i64, data: ReservationUpdate) -> RepoResult<Reservation> {
    let mut tx = begin_write(pool).await?;
    let current = fetch(&mut tx, id).await?.ok_or_else(|| not_found(id))?;

    let table_number = data.table_number.unwrap_or(current.table_number);
    let customer_id = data.customer_id.unwrap_or(current.customer_id);
    let starts_at = data.starts_at.unwrap_or(current.starts_at);
    let ends_at = match data.ends_at {
        Some(ends_at) => ends_at,
        None => end_after(starts_at, current.ends_at.saturating_sub(current.starts_at))?,
    };

    validate(&mut tx, table_number, customer_id, starts_at, ends_at, Some(id)).await?;

    sqlx::query(
        "UPDATE reservation SET table_number = ?, customer_id = ?, starts_at = ?, ends_at = ? WHERE id = ?",
    )
    .bind(table_number)
    .bind(customer_id)
    .bind(starts_at)
    .bind(ends_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    let updated = fetch(&mut tx, id).await?;
    tx.commit().await?;

    updated.ok_or_else(|| not_found(id))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    const T0: i64 = 1_700_000_000_000;
    const HOUR: i64 = DEFAULT_RESERVATION_MS;

    async fn add_customer(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO customer (name, phone, created_at) VALUES (?, '555', 0) RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn booking(table_number: i64, customer_id: i64, starts_at: i64) -> ReservationCreate {
        ReservationCreate {
            table_number,
            customer_id,
            starts_at,
            ends_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_one_hour() {
        let pool = test_pool().await;
        let ana = add_customer(&pool, "Ana").await;

        let r = create(&pool, booking(2, ana, T0)).await.unwrap();
        assert_eq!(r.ends_at, T0 + HOUR);
        assert_eq!(r.customer_name, "Ana");
        assert!(r.covers(T0));
        assert!(!r.covers(T0 + HOUR));
    }

    #[tokio::test]
    async fn test_overlap_on_same_table_is_rejected() {
        let pool = test_pool().await;
        let ana = add_customer(&pool, "Ana").await;
        let luis = add_customer(&pool, "Luis").await;
        create(&pool, booking(2, ana, T0)).await.unwrap();

        let err = create(&pool, booking(2, luis, T0 + HOUR / 2)).await.unwrap_err();
        assert!(matches!(err, RepoError::Rejected(ErrorCode::ReservationConflict, _)));

        // Back to back and other tables are fine
        create(&pool, booking(2, luis, T0 + HOUR)).await.unwrap();
        create(&pool, booking(3, luis, T0)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_validates_references() {
        let pool = test_pool().await;
        let ana = add_customer(&pool, "Ana").await;

        let err = create(&pool, booking(42, ana, T0)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::TableNotFound, _)));

        let err = create(&pool, booking(1, 999, T0)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::CustomerNotFound, _)));

        let err = create(
            &pool,
            ReservationCreate {
                ends_at: Some(T0),
                ..booking(1, ana, T0)
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_start_near_max_time_is_rejected() {
        let pool = test_pool().await;
        let ana = add_customer(&pool, "Ana").await;

        let err = create(&pool, booking(1, ana, i64::MAX - 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let r = create(&pool, booking(1, ana, T0)).await.unwrap();
        let err = update(
            &pool,
            r.id,
            ReservationUpdate {
                starts_at: Some(i64::MAX - 1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_duration_and_ignores_itself() {
        let pool = test_pool().await;
        let ana = add_customer(&pool, "Ana").await;
        let r = create(
            &pool,
            ReservationCreate {
                ends_at: Some(T0 + 2 * HOUR),
                ..booking(1, ana, T0)
            },
        )
        .await
        .unwrap();

        // Shifting by 30 minutes overlaps only with itself
        let moved = update(
            &pool,
            r.id,
            ReservationUpdate {
                starts_at: Some(T0 + HOUR / 2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.starts_at, T0 + HOUR / 2);
        assert_eq!(moved.ends_at, T0 + HOUR / 2 + 2 * HOUR);
    }

    #[tokio::test]
    async fn test_list_by_range_and_delete() {
        let pool = test_pool().await;
        let ana = add_customer(&pool, "Ana").await;
        let early = create(&pool, booking(1, ana, T0)).await.unwrap();
        create(&pool, booking(1, ana, T0 + 30 * HOUR)).await.unwrap();

        let today = find_all(&pool, Some((T0, T0 + 24 * HOUR))).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(find_all(&pool, None).await.unwrap().len(), 2);

        delete(&pool, early.id).await.unwrap();
        let err = delete(&pool, early.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::ReservationNotFound, _)));
    }
}
