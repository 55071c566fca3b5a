//! Data models
//!
//! Shared between pos-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps Unix millis.

pub mod customer;
pub mod dining_table;
pub mod inventory;
pub mod menu;
pub mod order;
pub mod recipe;
pub mod report;
pub mod reservation;
pub mod stock_preset;

// Re-exports
pub use customer::*;
pub use dining_table::*;
pub use inventory::*;
pub use menu::*;
pub use order::*;
pub use recipe::*;
pub use report::*;
pub use reservation::*;
pub use stock_preset::*;
