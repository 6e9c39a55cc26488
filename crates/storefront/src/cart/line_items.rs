//! Derivation of priced line items from cart entries.
//!
//! The cart stores only (meal ID, quantity) pairs. Joining those against
//! the catalog happens here, in one place, whether the result is rendered
//! on the cart page or submitted to the payment provider.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{CartEntry, CartError};
use crate::catalog::Catalog;

/// A cart entry joined with the catalog and priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Meal display name at derivation time.
    pub name: String,
    /// Unit price in integer minor currency units (cents).
    pub unit_amount_cents: i64,
    /// How many of this meal.
    pub quantity: u32,
}

/// Line items plus their order total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    /// One line per cart entry, in the cart's insertion order.
    pub line_items: Vec<LineItem>,
    /// Sum of unit price times quantity, rounded to two decimal places.
    pub total: Decimal,
}

/// Join cart entries against the catalog and total them.
///
/// Line items come out in the cart's insertion order with quantities
/// untouched. Per-line products are summed exactly; only the final total
/// is rounded.
///
/// # Errors
///
/// Returns `CartError::UnknownItem` naming the first entry whose meal is
/// missing from the catalog.
pub fn derive_line_items(entries: &[CartEntry], catalog: &Catalog) -> Result<PricedCart, CartError> {
    let mut line_items = Vec::with_capacity(entries.len());
    let mut total = Decimal::ZERO;

    for entry in entries {
        let meal = catalog
            .get(entry.meal_id)
            .ok_or(CartError::UnknownItem(entry.meal_id))?;

        total += meal.price * Decimal::from(entry.quantity);
        line_items.push(LineItem {
            name: meal.name.clone(),
            unit_amount_cents: to_cents(meal.price),
            quantity: entry.quantity,
        });
    }

    Ok(PricedCart {
        line_items,
        total: total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    })
}

/// Convert a major-unit price to integer minor units (cents),
/// rounding half away from zero.
fn to_cents(price: Decimal) -> i64 {
    (price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}
