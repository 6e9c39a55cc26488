//! In-memory menu catalog.
//!
//! The menu is loaded from `PostgreSQL` once at startup and shared
//! immutably across handlers. Every cart and checkout lookup addresses
//! meals by ID; nothing in the request path depends on menu positions.

use std::collections::HashMap;

use savory_core::MealId;

use crate::models::meal::Meal;

/// The menu, loaded once at startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Catalog {
    meals: Vec<Meal>,
    by_id: HashMap<MealId, usize>,
}

impl Catalog {
    /// Build a catalog from meals in display order.
    #[must_use]
    pub fn new(meals: Vec<Meal>) -> Self {
        let by_id = meals
            .iter()
            .enumerate()
            .map(|(idx, meal)| (meal.id, idx))
            .collect();

        Self { meals, by_id }
    }

    /// Look up a meal by ID.
    #[must_use]
    pub fn get(&self, id: MealId) -> Option<&Meal> {
        self.by_id.get(&id).and_then(|&idx| self.meals.get(idx))
    }

    /// Whether a meal with this ID is on the menu.
    #[must_use]
    pub fn contains(&self, id: MealId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All meals in display order.
    #[must_use]
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    /// Number of meals on the menu.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    /// Whether the menu is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Meal {
                id: MealId::new(1),
                name: "Tomato Basil Soup".to_owned(),
                price: Decimal::new(450, 2),
            },
            Meal {
                id: MealId::new(3),
                name: "Caesar Salad".to_owned(),
                price: Decimal::new(600, 2),
            },
            Meal {
                id: MealId::new(7),
                name: "Penne alla Vodka".to_owned(),
                price: Decimal::new(1100, 2),
            },
        ])
    }

    #[test]
    fn lookup_is_by_id_not_position() {
        let catalog = sample_catalog();

        // IDs are sparse; position 1 holds meal 3, not meal 2
        let meal = catalog.get(MealId::new(3)).unwrap();
        assert_eq!(meal.name, "Caesar Salad");
        assert!(catalog.get(MealId::new(2)).is_none());
    }

    #[test]
    fn contains_matches_get() {
        let catalog = sample_catalog();
        assert!(catalog.contains(MealId::new(7)));
        assert!(!catalog.contains(MealId::new(99)));
    }

    #[test]
    fn meals_preserve_display_order() {
        let catalog = sample_catalog();
        let ids: Vec<i32> = catalog.meals().iter().map(|m| m.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3, 7]);
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::new(Vec::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }
}
