//! Report Repository
//!
//! Raw rows for the reports; aggregation happens in `crate::reports`.

use shared::models::OrderStatus;
use sqlx::SqlitePool;

use super::RepoResult;

/// One sold unit (or an order without items: `name` / `price` are `None`)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SaleLine {
    pub order_id: i64,
    pub created_at: i64,
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Kitchen stamps of one finished order
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct KitchenTimeRow {
    pub order_id: i64,
    pub table_number: i64,
    pub started_at: i64,
    pub finished_at: i64,
}

/// Sold units of orders in `statuses` created within `[start, end)`
///
/// Either bound may be open.
pub async fn sale_lines(
    pool: &SqlitePool,
    statuses: &[OrderStatus],
    start: Option<i64>,
    end: Option<i64>,
) -> RepoResult<Vec<SaleLine>> {
    let lines = sqlx::query_as::<_, SaleLine>(&format!(
        r#"
        SELECT o.id AS order_id, o.created_at, oi.name, oi.price
        FROM orders o
        LEFT JOIN order_item oi ON oi.order_id = o.id
        WHERE o.status IN ({})
          AND (?1 IS NULL OR o.created_at >= ?1)
          AND (?2 IS NULL OR o.created_at < ?2)
        ORDER BY o.created_at, o.id, oi.position
        "#,
        OrderStatus::sql_list(statuses)
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

/// Sales-status orders whose kitchen work started and finished within `[start, end)`
pub async fn kitchen_times(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<KitchenTimeRow>> {
    let rows = sqlx::query_as::<_, KitchenTimeRow>(&format!(
        r#"
        SELECT id AS order_id, table_number,
               kitchen_started_at AS started_at, kitchen_finished_at AS finished_at
        FROM orders
        WHERE kitchen_started_at IS NOT NULL
          AND kitchen_finished_at IS NOT NULL
          AND kitchen_started_at >= ?
          AND kitchen_finished_at < ?
          AND status IN ({})
        ORDER BY kitchen_finished_at, id
        "#,
        OrderStatus::sql_list(&OrderStatus::SALES)
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    async fn add_order(pool: &SqlitePool, status: OrderStatus, created_at: i64, items: &[(&str, f64)]) -> i64 {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (table_number, status, created_at, updated_at) VALUES (1, ?, ?, ?) RETURNING id",
        )
        .bind(status)
        .bind(created_at)
        .bind(created_at)
        .fetch_one(pool)
        .await
        .unwrap();
        for (position, (name, price)) in items.iter().enumerate() {
            sqlx::query("INSERT INTO order_item (order_id, position, name, price) VALUES (?, ?, ?, ?)")
                .bind(id)
                .bind(position as i64)
                .bind(*name)
                .bind(*price)
                .execute(pool)
                .await
                .unwrap();
        }
        id
    }

    #[tokio::test]
    async fn test_sale_lines_filter_status_and_range() {
        let pool = test_pool().await;
        add_order(&pool, OrderStatus::Paid, 100, &[("Tacos", 50.0), ("Agua", 20.0)]).await;
        add_order(&pool, OrderStatus::Pending, 150, &[("Tacos", 50.0)]).await;
        add_order(&pool, OrderStatus::Delivered, 300, &[("Flan", 40.0)]).await;
        let empty = add_order(&pool, OrderStatus::Paid, 120, &[]).await;

        let lines = sale_lines(&pool, &OrderStatus::SETTLED, Some(100), Some(300)).await.unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().any(|l| l.order_id == empty && l.name.is_none()));

        let open = sale_lines(&pool, &OrderStatus::SETTLED, None, None).await.unwrap();
        assert_eq!(open.len(), 4);
    }

    #[tokio::test]
    async fn test_kitchen_times_need_both_stamps() {
        let pool = test_pool().await;
        let done = add_order(&pool, OrderStatus::Ready, 0, &[]).await;
        let cooking = add_order(&pool, OrderStatus::InPreparation, 0, &[]).await;
        sqlx::query("UPDATE orders SET kitchen_started_at = 1000, kitchen_finished_at = 61000 WHERE id = ?")
            .bind(done)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE orders SET kitchen_started_at = 1000 WHERE id = ?")
            .bind(cooking)
            .execute(&pool)
            .await
            .unwrap();

        let rows = kitchen_times(&pool, 0, 100_000).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id, done);
        assert_eq!(rows[0].finished_at, 61_000);
    }
}
