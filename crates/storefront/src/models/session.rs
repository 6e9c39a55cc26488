//! Session-related types.
//!
//! Types stored in the session cookie's server-side record. The session
//! holds identity and the cart ID only; cart contents live in the
//! in-memory cart store.

use serde::{Deserialize, Serialize};

use savory_core::{CustomerId, Email};

use crate::models::customer::Customer;

/// The identity slice of a customer that rides in the session record.
///
/// Enough to greet the customer in the navigation and stamp orders with
/// their id, without touching the `customer` table on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedInCustomer {
    /// Customer's database ID.
    pub id: CustomerId,
    /// Customer's display name.
    pub name: String,
    /// Customer's email address.
    pub email: Email,
}

impl From<&Customer> for SignedInCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
        }
    }
}

/// Names of the entries this app keeps in the session record.
pub mod keys {
    /// The signed-in customer, absent for anonymous visitors.
    pub const SIGNED_IN_CUSTOMER: &str = "signed_in_customer";

    /// The visitor's cart id, minted on first cart mutation.
    pub const CART_ID: &str = "cart_id";
}
