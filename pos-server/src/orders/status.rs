//! 订单状态流转
//!
//! 厨房计时规则：
//! - 首次进入 `InPreparation` 记录开始时间
//! - 进入 `Ready` 时，若已开始且未结束，记录结束时间
//! - `Paid` 为终态，之后不允许任何状态变更

use shared::models::OrderStatus;

/// Kitchen timestamps of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KitchenStamps {
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,
}

/// Status change refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyPaid;

/// Compute the kitchen timestamps after moving `current → next` at `now`
pub fn transition(
    current: OrderStatus,
    next: OrderStatus,
    stamps: KitchenStamps,
    now: i64,
) -> Result<KitchenStamps, AlreadyPaid> {
    if current.is_terminal() {
        return Err(AlreadyPaid);
    }

    let mut stamps = stamps;
    match next {
        OrderStatus::InPreparation if stamps.started_at.is_none() => {
            stamps.started_at = Some(now);
        }
        OrderStatus::Ready if stamps.started_at.is_some() && stamps.finished_at.is_none() => {
            stamps.finished_at = Some(now);
        }
        _ => {}
    }
    Ok(stamps)
}

/// Whether removed items may go back to inventory
///
/// Only before the kitchen has touched the order: once preparation started
/// the ingredients are considered consumed.
pub fn stock_returnable(status: OrderStatus, stamps: KitchenStamps) -> bool {
    stamps.started_at.is_none()
        && matches!(status, OrderStatus::TakingOrder | OrderStatus::Pending)
}
