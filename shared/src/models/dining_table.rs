//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Virtual table used for app / delivery orders
pub const DIGITAL_TABLE: i64 = 99;

/// Capacity reported for the virtual table
pub const DIGITAL_TABLE_CAPACITY: i64 = 100;

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub number: i64,
    pub capacity: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i64,
    pub capacity: i64,
}

/// Table with its derived state
///
/// `occupied` and `reserved` are never stored: they are computed from
/// active orders and reservations at query time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableState {
    pub number: i64,
    pub capacity: i64,
    pub occupied: bool,
    pub reserved: bool,
    pub is_virtual: bool,
    /// Customer of the current or next reservation today
    pub reserved_customer_name: Option<String>,
    /// Start of the current or next reservation today (Unix millis)
    pub reserved_at: Option<i64>,
}

impl TableState {
    /// The digital table: never occupied, never reserved
    pub fn digital() -> Self {
        Self {
            number: DIGITAL_TABLE,
            capacity: DIGITAL_TABLE_CAPACITY,
            occupied: false,
            reserved: false,
            is_virtual: true,
            reserved_customer_name: None,
            reserved_at: None,
        }
    }
}
