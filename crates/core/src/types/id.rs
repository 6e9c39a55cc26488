//! Integer and UUID id wrappers.
//!
//! `define_id!` mints a distinct wrapper per entity so a meal id cannot
//! stand in for a customer id. Carts never touch the database, so
//! [`CartId`] is a UUID minted per visitor rather than a
//! database-assigned integer.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Define a newtype ID over `i32`.
///
/// The wrapper serializes transparently, converts to and from `i32`, and
/// (behind the `postgres` feature) encodes as a plain `INTEGER` column.
///
/// # Example
///
/// ```rust
/// # use savory_core::define_id;
/// define_id!(MealId);
/// define_id!(CustomerId);
///
/// let meal_id = MealId::new(1);
/// let customer_id = CustomerId::new(1);
///
/// // A meal id is not a customer id; the next line would not compile:
/// // let _: MealId = customer_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database id.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database id.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(MealId);
define_id!(CustomerId);

/// Identifier for a visitor's in-memory cart.
///
/// Minted when a visitor first touches their cart and carried in the
/// session cookie. Never persisted server-side beyond the cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(Uuid);

impl CartId {
    /// Mint a fresh random cart ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn meal_id_roundtrips_through_i32() {
        let id = MealId::new(7);
        assert_eq!(id.as_i32(), 7);
        assert_eq!(MealId::from(7), id);
        assert_eq!(i32::from(id), 7);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = CustomerId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let parsed: CustomerId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn generated_cart_ids_are_distinct() {
        let a = CartId::generate();
        let b = CartId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn cart_id_serde_roundtrip() {
        let id = CartId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: CartId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
