//! Reservation Model

use serde::{Deserialize, Serialize};

/// Duration assumed for a reservation without an explicit end (1 hour)
pub const DEFAULT_RESERVATION_MS: i64 = 60 * 60 * 1000;

/// Reservation entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub table_number: i64,
    pub customer_id: i64,
    /// Joined from `customer`
    pub customer_name: String,
    pub starts_at: i64,
    pub ends_at: i64,
}

impl Reservation {
    /// Whether `at` falls inside `[starts_at, ends_at)`
    pub fn covers(&self, at: i64) -> bool {
        self.starts_at <= at && at < self.ends_at
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub table_number: i64,
    pub customer_id: i64,
    pub starts_at: i64,
    /// Defaults to `starts_at` + 1 hour
    pub ends_at: Option<i64>,
}

/// Update reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub table_number: Option<i64>,
    pub customer_id: Option<i64>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
}
