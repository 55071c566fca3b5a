//! 库存与出餐监控
//!
//! 两个定时任务：低库存预警、出餐延迟提醒。
//! 只在告警集合变化时记录日志，恢复正常时记录一次 `info!`。

mod alert;

pub use alert::{AlertChange, AlertSet};

use std::time::Duration;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::repository::{inventory, order};

/// Register both monitors on the task manager
pub fn register(tasks: &mut BackgroundTasks, pool: &SqlitePool, config: &Config) {
    let token = tasks.shutdown_token();
    let stock_pool = pool.clone();
    let stock_every = Duration::from_secs(config.stock_check_interval_secs.max(1));
    tasks.spawn(
        "low_stock_monitor",
        TaskKind::Periodic,
        low_stock_loop(stock_pool, stock_every, token),
    );

    let token = tasks.shutdown_token();
    let delay_pool = pool.clone();
    let delay_every = Duration::from_secs(config.delay_check_interval_secs.max(1));
    let threshold = config.delay_threshold_minutes;
    tasks.spawn(
        "delayed_order_monitor",
        TaskKind::Periodic,
        delayed_order_loop(delay_pool, delay_every, threshold, token),
    );
}

async fn low_stock_loop(pool: SqlitePool, every: Duration, token: CancellationToken) {
    let mut alerts = AlertSet::default();
    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let items = match inventory::find_low_stock(&pool).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Low stock check failed");
                continue;
            }
        };
        let keys = items.iter().map(|i| i.name.clone()).collect();
        match alerts.update(keys) {
            AlertChange::Raised => {
                let detail: Vec<String> = items
                    .iter()
                    .map(|i| format!("{} ({} {})", i.name, i.quantity, i.unit))
                    .collect();
                tracing::warn!(count = items.len(), items = %detail.join(", "), "Low stock");
            }
            AlertChange::Cleared => tracing::info!("Stock levels back above alert thresholds"),
            AlertChange::Unchanged => {}
        }
    }
}

async fn delayed_order_loop(
    pool: SqlitePool,
    every: Duration,
    threshold_minutes: i64,
    token: CancellationToken,
) {
    let mut alerts = AlertSet::default();
    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let now = shared::util::now_millis();
        let delayed = match order::find_delayed(&pool, now, threshold_minutes).await {
            Ok(delayed) => delayed,
            Err(e) => {
                tracing::error!(error = %e, "Delayed order check failed");
                continue;
            }
        };
        let keys = delayed.iter().map(|d| d.order_id.to_string()).collect();
        match alerts.update(keys) {
            AlertChange::Raised => {
                for d in &delayed {
                    tracing::warn!(
                        order_id = d.order_id,
                        table = d.table_number,
                        status = %d.status,
                        items = d.item_count,
                        minutes = d.minutes_waiting,
                        threshold_minutes,
                        "Order delayed"
                    );
                }
            }
            AlertChange::Cleared => tracing::info!("No delayed orders"),
            AlertChange::Unchanged => {}
        }
    }
}
