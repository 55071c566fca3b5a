//! 报表
//!
//! - [`aggregate`] - 纯聚合计算 (金额使用 `Decimal`)
//! - 本模块 - 读取数据并聚合，供 `/api/reports` 使用

pub mod aggregate;

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::models::{HourlySales, KitchenEfficiency, OrderStatus, ProductAnalysis, SalesSummary};
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, report};
use crate::utils::time::{day_end_millis, day_start_millis};

/// Sales summary of Ready / Delivered / Paid orders created in `[start, end)`
pub async fn sales_summary(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<SalesSummary> {
    let lines = report::sale_lines(pool, &OrderStatus::SALES, Some(start), Some(end)).await?;
    let summary = aggregate::sales_summary(start, end, &lines);
    tracing::info!(
        orders = summary.order_count,
        items = summary.items_sold,
        total = %summary.total_sales,
        "Sales summary generated"
    );
    Ok(summary)
}

/// Best / worst sellers among Delivered / Paid orders
pub async fn product_analysis(
    pool: &SqlitePool,
    start: Option<i64>,
    end: Option<i64>,
) -> RepoResult<ProductAnalysis> {
    let lines = report::sale_lines(pool, &OrderStatus::SETTLED, start, end).await?;
    Ok(aggregate::product_analysis(start, end, &lines))
}

/// Hourly sales of one local date in the business timezone
pub async fn hourly_sales(pool: &SqlitePool, date: NaiveDate, tz: Tz) -> RepoResult<HourlySales> {
    let lines = report::sale_lines(
        pool,
        &OrderStatus::SETTLED,
        Some(day_start_millis(date, tz)),
        Some(day_end_millis(date, tz)),
    )
    .await?;
    let hourly = aggregate::hourly_sales(date, tz, &lines);
    tracing::info!(
        date = %hourly.date,
        total = %hourly.total_sales,
        peak = ?hourly.peak_hour,
        "Hourly sales generated"
    );
    Ok(hourly)
}

/// Kitchen times of orders prepared in `[start, end)`
pub async fn kitchen_efficiency(
    pool: &SqlitePool,
    start: i64,
    end: i64,
) -> RepoResult<KitchenEfficiency> {
    let rows = report::kitchen_times(pool, start, end).await?;
    Ok(aggregate::kitchen_efficiency(start, end, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_summary_reads_only_sales_statuses() {
        let pool = test_pool().await;
        for (status, price) in [
            (OrderStatus::Paid, 50.0),
            (OrderStatus::Ready, 30.0),
            (OrderStatus::Pending, 99.0),
        ] {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO orders (table_number, status, created_at, updated_at) VALUES (1, ?, 10, 10) RETURNING id",
            )
            .bind(status)
            .fetch_one(&pool)
            .await
            .unwrap();
            sqlx::query("INSERT INTO order_item (order_id, position, name, price) VALUES (?, 0, 'Tacos', ?)")
                .bind(id)
                .bind(price)
                .execute(&pool)
                .await
                .unwrap();
        }

        let summary = sales_summary(&pool, 0, 100).await.unwrap();
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.total_sales, Decimal::from(80));

        // Ready is not settled
        let analysis = product_analysis(&pool, None, None).await.unwrap();
        assert_eq!(analysis.top_products[0].units, 1);
    }
}
