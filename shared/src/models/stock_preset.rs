//! Stock Preset Model

use serde::{Deserialize, Serialize};

/// Named restock bundle (进货预设)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockPreset {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<StockPresetItem>,
}

/// Ingredient quantity inside a preset, addressed by ingredient name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockPresetItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Create stock preset payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPresetCreate {
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<StockPresetItem>,
}

/// Result of applying a preset to inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPresetApplied {
    pub preset_id: i64,
    pub preset_name: String,
    /// Ingredients created because they did not exist yet
    pub created: Vec<String>,
    /// Ingredients whose quantity was increased
    pub restocked: Vec<String>,
}
