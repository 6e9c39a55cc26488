//! Per-visitor shopping carts.
//!
//! Carts are ephemeral and in-memory. Each visitor's session carries a
//! [`CartId`]; the store maps that ID to an insertion-ordered list of
//! (meal, quantity) entries behind a per-cart async lock. Two requests
//! racing on one visitor's cart serialize against each other without
//! blocking anyone else's. Locks guard only the in-memory mutation or
//! snapshot; catalog validation and all I/O happen outside them.
//!
//! Carts expire after 24 hours of inactivity via the cache's idle
//! eviction, so abandoned carts cost nothing to clean up.

pub mod line_items;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tokio::sync::Mutex;

use savory_core::{CartId, MealId};

use crate::catalog::Catalog;

pub use line_items::{LineItem, PricedCart, derive_line_items};

/// Carts are evicted after this much inactivity.
const CART_IDLE_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on concurrently live carts.
const MAX_LIVE_CARTS: u64 = 100_000;

/// Errors from cart operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The referenced meal does not exist in the catalog.
    #[error("meal {0} is not on the menu")]
    InvalidItem(MealId),

    /// The submitted quantity was not a whole number.
    #[error("'{0}' is not a valid quantity")]
    InvalidQuantity(String),

    /// A cart entry references a meal missing from the catalog.
    #[error("cart references meal {0} which is not on the menu")]
    UnknownItem(MealId),
}

/// A single cart entry: a meal and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEntry {
    /// Which meal.
    pub meal_id: MealId,
    /// How many of it (always >= 1 while stored).
    pub quantity: u32,
}

/// One visitor's cart contents, in insertion order.
#[derive(Debug, Default)]
struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Add one of `meal_id`, appending a new entry if absent.
    /// Returns the resulting quantity.
    fn increment(&mut self, meal_id: MealId) -> u32 {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.meal_id == meal_id) {
            entry.quantity = entry.quantity.saturating_add(1);
            return entry.quantity;
        }

        self.entries.push(CartEntry {
            meal_id,
            quantity: 1,
        });
        1
    }

    /// Set the exact quantity for `meal_id`.
    ///
    /// Zero removes the entry. An existing entry keeps its position; a new
    /// one is appended.
    fn set_quantity(&mut self, meal_id: MealId, quantity: u32) {
        if quantity == 0 {
            self.remove(meal_id);
            return;
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.meal_id == meal_id) {
            entry.quantity = quantity;
            return;
        }

        self.entries.push(CartEntry { meal_id, quantity });
    }

    /// Remove the entry for `meal_id` if present. Idempotent.
    fn remove(&mut self, meal_id: MealId) {
        self.entries.retain(|e| e.meal_id != meal_id);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn entries(&self) -> Vec<CartEntry> {
        self.entries.clone()
    }
}

/// Shared store of live carts, keyed by [`CartId`].
#[derive(Clone)]
pub struct CartStore {
    carts: Cache<CartId, Arc<Mutex<Cart>>>,
}

impl CartStore {
    /// Create an empty cart store.
    #[must_use]
    pub fn new() -> Self {
        let carts = Cache::builder()
            .max_capacity(MAX_LIVE_CARTS)
            .time_to_idle(CART_IDLE_EXPIRY)
            .build();

        Self { carts }
    }

    /// Fetch the cart for `id`, creating it if this is the first touch.
    async fn cart(&self, id: CartId) -> Arc<Mutex<Cart>> {
        self.carts
            .get_with(id, async { Arc::new(Mutex::new(Cart::default())) })
            .await
    }

    /// Add one of `meal_id` to the cart. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidItem` if the meal is not in the catalog.
    pub async fn add_one(
        &self,
        id: CartId,
        meal_id: MealId,
        catalog: &Catalog,
    ) -> Result<u32, CartError> {
        if !catalog.contains(meal_id) {
            return Err(CartError::InvalidItem(meal_id));
        }

        let cart = self.cart(id).await;
        let mut guard = cart.lock().await;
        Ok(guard.increment(meal_id))
    }

    /// Set the exact quantity for `meal_id` from raw form input.
    ///
    /// Zero and negative quantities remove the entry. Returns the applied
    /// quantity, with zero meaning removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if the input is not a whole
    /// number, or `CartError::InvalidItem` if the meal is not in the catalog.
    pub async fn set_quantity(
        &self,
        id: CartId,
        meal_id: MealId,
        raw_quantity: &str,
        catalog: &Catalog,
    ) -> Result<u32, CartError> {
        let requested: i64 = raw_quantity
            .trim()
            .parse()
            .map_err(|_| CartError::InvalidQuantity(raw_quantity.to_owned()))?;

        if !catalog.contains(meal_id) {
            return Err(CartError::InvalidItem(meal_id));
        }

        let quantity = u32::try_from(requested.max(0))
            .map_err(|_| CartError::InvalidQuantity(raw_quantity.to_owned()))?;

        let cart = self.cart(id).await;
        let mut guard = cart.lock().await;
        guard.set_quantity(meal_id, quantity);
        Ok(quantity)
    }

    /// Remove `meal_id` from the cart. Idempotent; an absent cart or
    /// absent entry is a no-op.
    pub async fn remove(&self, id: CartId, meal_id: MealId) {
        if let Some(cart) = self.carts.get(&id).await {
            cart.lock().await.remove(meal_id);
        }
    }

    /// Empty and drop the cart. Idempotent.
    ///
    /// Used after a completed checkout and on logout.
    pub async fn clear(&self, id: CartId) {
        if let Some(cart) = self.carts.get(&id).await {
            cart.lock().await.clear();
        }
        self.carts.invalidate(&id).await;
    }

    /// Copy the cart's entries in insertion order.
    ///
    /// Reads never create a cart; an absent cart snapshots as empty.
    pub async fn snapshot(&self, id: CartId) -> Vec<CartEntry> {
        match self.carts.get(&id).await {
            Some(cart) => cart.lock().await.entries(),
            None => Vec::new(),
        }
    }

    /// Whether the cart has no entries.
    pub async fn is_empty(&self, id: CartId) -> bool {
        self.snapshot(id).await.is_empty()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
