//! Inventory Model

use serde::{Deserialize, Serialize};

/// Unit used when none is given
pub const DEFAULT_UNIT: &str = "unit";

/// Alert threshold used when none is given
pub const DEFAULT_MIN_ALERT_QUANTITY: f64 = 5.0;

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_min_alert_quantity() -> f64 {
    DEFAULT_MIN_ALERT_QUANTITY
}

/// Stocked ingredient (库存)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Low-stock alert fires when `quantity <= min_alert_quantity`
    pub min_alert_quantity: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl InventoryItem {
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_alert_quantity
    }
}

/// Add / restock payload
///
/// Creates the ingredient, or adds `quantity` to an existing one with the same name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub name: String,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_min_alert_quantity")]
    pub min_alert_quantity: f64,
}

/// Update payload: absolute values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemUpdate {
    pub quantity: f64,
    pub unit: String,
    pub min_alert_quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let item: InventoryItemCreate =
            serde_json::from_str(r#"{"name": "Tortillas", "quantity": 20}"#).unwrap();
        assert_eq!(item.unit, "unit");
        assert_eq!(item.min_alert_quantity, 5.0);
    }

    #[test]
    fn test_is_low_includes_threshold() {
        let mut item = InventoryItem {
            id: 1,
            name: "Queso".into(),
            quantity: 5.0,
            unit: "kg".into(),
            min_alert_quantity: 5.0,
            created_at: 0,
            updated_at: 0,
        };
        assert!(item.is_low());
        item.quantity = 5.5;
        assert!(!item.is_low());
    }
}
