//! Stock planning for orders
//!
//! Turns a change in ordered dishes into a per-ingredient requirement and
//! checks it against stock. Pure: loading recipe lines and writing the
//! deductions is done by `db::repository::stock` inside one transaction.
//!
//! A requirement is signed: positive quantities must be available and are
//! deducted, negative quantities are returned to stock. Quantities are
//! `Decimal` rounded to [`QUANTITY_SCALE`] places, so `3 × 0.1` equals `0.3`.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use shared::models::OrderItem;

/// Decimal places kept for ingredient quantities
pub const QUANTITY_SCALE: u32 = 6;

/// Stored `REAL` quantity as a rounded `Decimal` (non-finite values become zero)
pub fn quantity(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp(QUANTITY_SCALE)
        .normalize()
}

/// `Decimal` quantity back to the `REAL` the database stores
pub fn quantity_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Ingredient line of a dish's recipe, with the stock on hand
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeLine {
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub quantity_needed: Decimal,
    pub available: Decimal,
}

/// Net requirement of one ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientNeed {
    pub ingredient_id: i64,
    pub ingredient_name: String,
    /// First dish (in order of appearance) that consumes the ingredient
    pub dish: String,
    pub available: Decimal,
    /// > 0 consumes stock, < 0 returns stock
    pub required: Decimal,
}

/// Rejection for an ingredient that cannot cover its requirement
#[derive(Debug, Clone, PartialEq)]
pub struct StockShortage {
    pub ingredient: String,
    pub dish: String,
    pub available: f64,
    pub required: f64,
}

impl StockShortage {
    fn of(need: &IngredientNeed, available: Decimal) -> Self {
        Self {
            ingredient: need.ingredient_name.clone(),
            dish: need.dish.clone(),
            available: quantity_f64(available),
            required: quantity_f64(need.required),
        }
    }
}

impl fmt::Display for StockShortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough {} to prepare {}: available {}, required {}",
            self.ingredient, self.dish, self.available, self.required
        )
    }
}

/// Per-dish counts in first-appearance order
#[derive(Default)]
struct Counts {
    index: HashMap<String, usize>,
    entries: Vec<(String, i64)>,
}

impl Counts {
    fn add(&mut self, name: &str, n: i64) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += n,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), n));
            }
        }
    }
}

/// Count units per dish name, keeping first-appearance order
pub fn count_items(items: &[OrderItem]) -> Vec<(String, i64)> {
    let mut counts = Counts::default();
    for item in items {
        counts.add(&item.name, 1);
    }
    counts.entries
}

/// Signed per-dish difference `new - old`, dropping dishes that did not change
pub fn diff_counts(old: &[OrderItem], new: &[OrderItem]) -> Vec<(String, i64)> {
    let mut counts = Counts::default();
    for item in new {
        counts.add(&item.name, 1);
    }
    for item in old {
        counts.add(&item.name, -1);
    }
    let mut delta = counts.entries;
    delta.retain(|(_, n)| *n != 0);
    delta
}

/// Negate every count (used to return a whole order to stock)
pub fn negate(counts: Vec<(String, i64)>) -> Vec<(String, i64)> {
    counts.into_iter().map(|(name, n)| (name, -n)).collect()
}

/// Per-ingredient requirement for a set of dish count changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockPlan {
    pub needs: Vec<IngredientNeed>,
}

impl StockPlan {
    /// Aggregate `quantity_needed × count` per ingredient across all dishes
    ///
    /// Dishes without a recipe consume nothing. Ingredients whose changes
    /// cancel out are dropped.
    pub fn build(counts: &[(String, i64)], recipes: &HashMap<String, Vec<RecipeLine>>) -> Self {
        let mut index: HashMap<i64, usize> = HashMap::new();
        let mut needs: Vec<IngredientNeed> = Vec::new();
        for (dish, count) in counts {
            let Some(lines) = recipes.get(dish) else {
                continue;
            };
            for line in lines {
                let qty = line.quantity_needed * Decimal::from(*count);
                match index.get(&line.ingredient_id) {
                    Some(&i) => needs[i].required += qty,
                    None => {
                        index.insert(line.ingredient_id, needs.len());
                        needs.push(IngredientNeed {
                            ingredient_id: line.ingredient_id,
                            ingredient_name: line.ingredient_name.clone(),
                            dish: dish.clone(),
                            available: line.available,
                            required: qty,
                        });
                    }
                }
            }
        }
        for need in &mut needs {
            need.required = need.required.round_dp(QUANTITY_SCALE).normalize();
        }
        needs.retain(|n| !n.required.is_zero());
        Self { needs }
    }

    /// First ingredient whose positive requirement exceeds the stock on hand
    pub fn check(&self) -> Result<(), StockShortage> {
        match self
            .needs
            .iter()
            .find(|n| n.required.is_sign_positive() && n.available < n.required)
        {
            Some(n) => Err(StockShortage::of(n, n.available)),
            None => Ok(()),
        }
    }

    /// Shortage of `need` against a freshly read stock level
    pub fn shortage(need: &IngredientNeed, available: f64) -> StockShortage {
        StockShortage::of(need, quantity(available))
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            price: 10.0,
            kind: "Plato".to_string(),
        }
    }

    fn line(id: i64, name: &str, needed: f64, available: f64) -> RecipeLine {
        RecipeLine {
            ingredient_id: id,
            ingredient_name: name.to_string(),
            quantity_needed: quantity(needed),
            available: quantity(available),
        }
    }

    fn recipes() -> HashMap<String, Vec<RecipeLine>> {
        let mut map = HashMap::new();
        map.insert(
            "Tacos".to_string(),
            vec![line(1, "Tortilla", 3.0, 10.0), line(2, "Carne", 0.1, 1.0)],
        );
        map.insert("Quesadilla".to_string(), vec![line(1, "Tortilla", 1.0, 10.0)]);
        map
    }

    #[test]
    fn test_quantity_rounds_float_noise() {
        assert_eq!(quantity(0.1 * 3.0), Decimal::new(3, 1));
        assert_eq!(quantity(1.0 - 0.7), Decimal::new(3, 1));
        assert_eq!(quantity(f64::NAN), Decimal::ZERO);
        assert_eq!(quantity_f64(Decimal::new(3, 1)), 0.3);
    }

    #[test]
    fn test_count_items_keeps_first_appearance_order() {
        let items = vec![item("Tacos"), item("Agua"), item("Tacos")];
        assert_eq!(
            count_items(&items),
            vec![("Tacos".to_string(), 2), ("Agua".to_string(), 1)]
        );
    }

    #[test]
    fn test_repeated_items_multiply_requirement() {
        let counts = count_items(&[item("Tacos"), item("Tacos")]);
        let plan = StockPlan::build(&counts, &recipes());
        let tortilla = plan.needs.iter().find(|n| n.ingredient_id == 1).unwrap();
        assert_eq!(tortilla.required, Decimal::from(6));
        assert!(plan.check().is_ok());
    }

    #[test]
    fn test_shared_ingredient_is_summed_across_dishes() {
        // 3 tacos (9 tortillas) + 2 quesadillas (2 tortillas) = 11 > 10
        let items = vec![
            item("Tacos"),
            item("Tacos"),
            item("Tacos"),
            item("Quesadilla"),
            item("Quesadilla"),
        ];
        let plan = StockPlan::build(&count_items(&items), &recipes());
        let shortage = plan.check().unwrap_err();
        assert_eq!(shortage.ingredient, "Tortilla");
        assert_eq!(shortage.dish, "Tacos");
        assert_eq!(shortage.available, 10.0);
        assert_eq!(shortage.required, 11.0);
    }

    #[test]
    fn test_exact_stock_is_enough() {
        let mut map = HashMap::new();
        map.insert("Tacos".to_string(), vec![line(1, "Tortilla", 5.0, 10.0)]);
        let plan = StockPlan::build(&[("Tacos".to_string(), 2)], &map);
        assert!(plan.check().is_ok());
    }

    #[test]
    fn test_exact_fractional_stock_is_enough() {
        // 3 × 0.1 kg against 0.3 kg on hand
        let mut map = HashMap::new();
        map.insert("Quesadilla".to_string(), vec![line(1, "Queso", 0.1, 0.3)]);
        let plan = StockPlan::build(&[("Quesadilla".to_string(), 3)], &map);
        assert_eq!(plan.needs[0].required, Decimal::new(3, 1));
        assert!(plan.check().is_ok());

        let plan = StockPlan::build(&[("Quesadilla".to_string(), 4)], &map);
        let shortage = plan.check().unwrap_err();
        assert_eq!(shortage.available, 0.3);
        assert_eq!(shortage.required, 0.4);
    }

    #[test]
    fn test_dish_without_recipe_consumes_nothing() {
        let plan = StockPlan::build(&[("Agua".to_string(), 4)], &recipes());
        assert!(plan.is_empty());
        assert!(plan.check().is_ok());
    }

    #[test]
    fn test_diff_counts() {
        let old = vec![item("Tacos"), item("Tacos"), item("Agua")];
        let new = vec![item("Tacos"), item("Quesadilla")];
        let mut delta = diff_counts(&old, &new);
        delta.sort();
        assert_eq!(
            delta,
            vec![
                ("Agua".to_string(), -1),
                ("Quesadilla".to_string(), 1),
                ("Tacos".to_string(), -1),
            ]
        );
    }

    #[test]
    fn test_negative_requirement_never_fails_check() {
        // Returning stock works even when the ingredient is at zero
        let mut map = HashMap::new();
        map.insert("Tacos".to_string(), vec![line(1, "Tortilla", 3.0, 0.0)]);
        let plan = StockPlan::build(&negate(vec![("Tacos".to_string(), 2)]), &map);
        assert_eq!(plan.needs[0].required, Decimal::from(-6));
        assert!(plan.check().is_ok());
    }

    #[test]
    fn test_swapping_dishes_with_equal_need_nets_to_zero() {
        // 1 Sope (0.3 queso) out, 3 Quesadillas (3 × 0.1 queso) in, nothing on hand
        let mut map = HashMap::new();
        map.insert("Sope".to_string(), vec![line(1, "Queso", 0.3, 0.0)]);
        map.insert("Quesadilla".to_string(), vec![line(1, "Queso", 0.1, 0.0)]);
        let old = vec![item("Sope")];
        let new = vec![item("Quesadilla"), item("Quesadilla"), item("Quesadilla")];

        let plan = StockPlan::build(&diff_counts(&old, &new), &map);
        assert!(plan.is_empty());
        assert!(plan.check().is_ok());
    }

    #[test]
    fn test_shortage_message() {
        let shortage = StockShortage {
            ingredient: "Queso".into(),
            dish: "Quesadilla".into(),
            available: 0.5,
            required: 1.0,
        };
        assert_eq!(
            shortage.to_string(),
            "Not enough Queso to prepare Quesadilla: available 0.5, required 1"
        );
    }
}
