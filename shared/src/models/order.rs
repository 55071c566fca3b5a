//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// `TakingOrder → Pending → InPreparation → Ready → Delivered → Paid`.
/// Only `Paid` is terminal; the kitchen may move back and forth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    /// Waiter is still taking the order at the table
    TakingOrder,
    /// Sent to the kitchen, not started
    #[default]
    Pending,
    InPreparation,
    Ready,
    Delivered,
    Paid,
}

impl OrderStatus {
    /// Statuses shown on the kitchen screen
    pub const KITCHEN_ACTIVE: [OrderStatus; 3] = [Self::Pending, Self::InPreparation, Self::Ready];

    /// Statuses that keep a table occupied
    pub const TABLE_OCCUPYING: [OrderStatus; 5] = [
        Self::TakingOrder,
        Self::Pending,
        Self::InPreparation,
        Self::Ready,
        Self::Delivered,
    ];

    /// Statuses counted by the sales summary and kitchen efficiency reports
    pub const SALES: [OrderStatus; 3] = [Self::Ready, Self::Delivered, Self::Paid];

    /// Statuses counted by product analysis and hourly sales
    pub const SETTLED: [OrderStatus; 2] = [Self::Delivered, Self::Paid];

    /// Statuses watched by the delay monitor
    pub const DELAY_WATCHED: [OrderStatus; 2] = [Self::Pending, Self::InPreparation];

    /// Database / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TakingOrder => "TAKING_ORDER",
            Self::Pending => "PENDING",
            Self::InPreparation => "IN_PREPARATION",
            Self::Ready => "READY",
            Self::Delivered => "DELIVERED",
            Self::Paid => "PAID",
        }
    }

    pub fn is_kitchen_active(&self) -> bool {
        Self::KITCHEN_ACTIVE.contains(self)
    }

    pub fn occupies_table(&self) -> bool {
        Self::TABLE_OCCUPYING.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// SQL `IN (...)` list for a status group, e.g. `'PENDING','READY'`
    pub fn sql_list(statuses: &[OrderStatus]) -> String {
        statuses
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of a menu item inside an order
///
/// Repeated units are repeated entries; quantity is derived by counting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub kind: String,
}

/// Order entity (订单)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub table_number: i64,
    /// Sequential number for orders on the digital table
    pub app_number: Option<i64>,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub kitchen_started_at: Option<i64>,
    pub kitchen_finished_at: Option<i64>,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Minutes between kitchen start and finish (1 decimal)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub kitchen_minutes: Option<f64>,
}

impl Order {
    /// Order total (sum of unit prices)
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.price).sum()
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_number: i64,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: OrderStatus,
    pub notes: Option<String>,
}

/// Replace order payload (PUT)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub table_number: i64,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub notes: Option<String>,
}

/// Status change payload (PATCH)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Order whose items have waited longer than the delay threshold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DelayedOrder {
    pub order_id: i64,
    pub table_number: i64,
    pub status: OrderStatus,
    pub item_count: usize,
    pub created_at: i64,
    /// Minutes since the order was placed (1 decimal)
    pub minutes_waiting: f64,
}
