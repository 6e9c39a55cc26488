//! Meal domain type.

use rust_decimal::Decimal;

use savory_core::MealId;

/// A meal on the menu (domain type).
///
/// Prices are exact decimals, never floats. `NUMERIC(10, 2)` in the
/// database, [`Decimal`] in memory, integer cents on the wire to the
/// payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    /// Unique meal ID.
    pub id: MealId,
    /// Display name, e.g. "Tomato Basil Soup".
    pub name: String,
    /// Unit price in major currency units (non-negative).
    pub price: Decimal,
}
