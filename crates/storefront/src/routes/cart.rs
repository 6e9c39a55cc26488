//! Shopping cart pages and mutations.
//!
//! The session stores only a cart ID; contents live in the in-memory
//! cart store and are priced against the catalog on every render.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use savory_core::{CartId, MealId};

use crate::cart::{CartEntry, CartError, PricedCart, derive_line_items};
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::models::{SignedInCustomer, session_keys};
use crate::routes::{NoticeQuery, redirect_with_notice};
use crate::state::AppState;

/// Notice shown when a cart operation names a meal that is not on the menu.
const UNKNOWN_MEAL_NOTICE: &str = "That meal is not on the menu.";

/// Notice shown when a quantity field does not parse as a whole number.
const BAD_QUANTITY_NOTICE: &str = "Please enter a whole number for the quantity.";

// =============================================================================
// Views
// =============================================================================

/// One rendered cart row.
#[derive(Clone)]
pub struct CartItemView {
    pub meal_id: MealId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// What the cart template renders: priced rows plus the grand total.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
}

/// Dollars-and-cents rendering for the cart page.
fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Pair cart entries with their priced line items for display.
///
/// `priced` must come from deriving exactly `entries`, so the two run in
/// the same order and length.
fn build_cart_view(entries: &[CartEntry], priced: &PricedCart) -> CartView {
    let items = entries
        .iter()
        .zip(&priced.line_items)
        .map(|(entry, item)| {
            let unit_price = Decimal::new(item.unit_amount_cents, 2);
            let line_total = unit_price * Decimal::from(item.quantity);
            CartItemView {
                meal_id: entry.meal_id,
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: format_price(unit_price),
                line_total: format_price(line_total),
            }
        })
        .collect();

    CartView {
        items,
        total: format_price(priced.total),
    }
}

// =============================================================================
// Session Plumbing
// =============================================================================

/// The visitor's cart id, if the session has one.
pub(crate) async fn get_cart_id(session: &Session) -> Option<CartId> {
    session
        .get::<CartId>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// The visitor's cart id, minted on first use.
pub(crate) async fn ensure_cart_id(
    session: &Session,
) -> Result<CartId, tower_sessions::session::Error> {
    if let Some(cart_id) = session.get::<CartId>(session_keys::CART_ID).await? {
        return Ok(cart_id);
    }

    let cart_id = CartId::generate();
    session.insert(session_keys::CART_ID, cart_id).await?;
    Ok(cart_id)
}

// =============================================================================
// Page Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub customer: Option<SignedInCustomer>,
    pub notice: Option<String>,
}

// =============================================================================
// Routes
// =============================================================================

/// Render the cart with priced rows and the total.
#[instrument(skip(state, session, customer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<NoticeQuery>,
) -> crate::error::Result<impl IntoResponse> {
    let entries = match get_cart_id(&session).await {
        Some(cart_id) => state.carts().snapshot(cart_id).await,
        None => Vec::new(),
    };

    // Entries are validated against the catalog on insert, so a pricing
    // failure here means the store and catalog disagree.
    let priced = derive_line_items(&entries, state.catalog())
        .map_err(|e| AppError::Internal(format!("cart pricing failed: {e}")))?;

    Ok(CartShowTemplate {
        cart: build_cart_view(&entries, &priced),
        customer,
        notice: query.notice,
    })
}

/// Add one of a meal to the cart, then return to the menu.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(meal_id): Path<MealId>,
) -> crate::error::Result<Response> {
    let cart_id = ensure_cart_id(&session).await?;

    match state.carts().add_one(cart_id, meal_id, state.catalog()).await {
        Ok(quantity) => {
            tracing::debug!(%meal_id, quantity, "Added meal to cart");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::warn!(%meal_id, "Rejected cart add: {e}");
            Ok(redirect_with_notice("/", UNKNOWN_MEAL_NOTICE))
        }
    }
}

/// Remove a meal from the cart, then return to the cart page.
///
/// Absent carts and absent entries are a no-op.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(meal_id): Path<MealId>,
) -> Response {
    if let Some(cart_id) = get_cart_id(&session).await {
        state.carts().remove(cart_id, meal_id).await;
    }

    Redirect::to("/shopping-cart").into_response()
}

/// Set a meal's exact quantity from its form field.
///
/// The form carries one field per line, named `quantity-{meal_id}`. Zero
/// and negatives remove the line; a non-numeric value is refused with a
/// notice.
#[instrument(skip(state, session, form))]
pub async fn update_quantity(
    State(state): State<AppState>,
    session: Session,
    Path(meal_id): Path<MealId>,
    Form(form): Form<HashMap<String, String>>,
) -> crate::error::Result<Response> {
    let cart_id = ensure_cart_id(&session).await?;

    let field = format!("quantity-{meal_id}");
    let raw = form.get(&field).map(String::as_str).unwrap_or_default();

    match state
        .carts()
        .set_quantity(cart_id, meal_id, raw, state.catalog())
        .await
    {
        Ok(quantity) => {
            tracing::debug!(%meal_id, quantity, "Updated cart quantity");
            Ok(Redirect::to("/shopping-cart").into_response())
        }
        Err(e @ CartError::InvalidQuantity(_)) => {
            tracing::warn!(%meal_id, "Rejected quantity update: {e}");
            Ok(redirect_with_notice("/shopping-cart", BAD_QUANTITY_NOTICE))
        }
        Err(e) => {
            tracing::warn!(%meal_id, "Rejected quantity update: {e}");
            Ok(redirect_with_notice("/shopping-cart", UNKNOWN_MEAL_NOTICE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;

    fn entry(meal_id: i32, quantity: u32) -> CartEntry {
        CartEntry {
            meal_id: meal_id.into(),
            quantity,
        }
    }

    fn line_item(name: &str, cents: i64, quantity: u32) -> LineItem {
        LineItem {
            name: name.to_owned(),
            unit_amount_cents: cents,
            quantity,
        }
    }

    #[test]
    fn cart_view_pairs_entries_with_line_items() {
        let entries = vec![entry(7, 2), entry(3, 1)];
        let priced = PricedCart {
            line_items: vec![
                line_item("Tomato Basil Soup", 450, 2),
                line_item("Caesar Salad", 600, 1),
            ],
            total: Decimal::new(1500, 2),
        };

        let view = build_cart_view(&entries, &priced);

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].meal_id, 7.into());
        assert_eq!(view.items[0].name, "Tomato Basil Soup");
        assert_eq!(view.items[0].unit_price, "$4.50");
        assert_eq!(view.items[0].line_total, "$9.00");
        assert_eq!(view.items[1].line_total, "$6.00");
        assert_eq!(view.total, "$15.00");
    }

    #[test]
    fn empty_cart_view_totals_zero() {
        let priced = PricedCart {
            line_items: Vec::new(),
            total: Decimal::ZERO,
        };

        let view = build_cart_view(&[], &priced);

        assert!(view.items.is_empty());
        assert_eq!(view.total, "$0.00");
    }
}
