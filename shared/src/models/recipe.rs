//! Recipe Model

use serde::{Deserialize, Serialize};

/// Recipe entity (配方): what one unit of a dish consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Recipe {
    pub id: i64,
    /// Menu item name this recipe belongs to
    pub dish_name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

/// Ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeIngredient {
    pub ingredient_id: i64,
    /// Joined from `inventory_item`
    pub ingredient_name: String,
    /// Quantity consumed per unit of the dish
    pub quantity_needed: f64,
    pub unit: String,
}

/// Ingredient line in create / update payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    pub ingredient_id: i64,
    pub quantity_needed: f64,
    pub unit: String,
}

/// Create recipe payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub dish_name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Vec<RecipeIngredientInput>,
}

/// Update recipe payload
///
/// `ingredients`, when present, replaces every existing line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub dish_name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Option<Vec<RecipeIngredientInput>>,
}
