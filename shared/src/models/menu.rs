//! Menu Model

use serde::{Deserialize, Serialize};

/// Menu item entity (菜单项)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Free-form grouping shown by the client ("Entrada", "Bebida", ...)
    pub kind: String,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub kind: String,
}

/// Menu items are addressed by `(name, kind)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemKey {
    pub name: String,
    pub kind: String,
}
