//! Checkout preconditions.
//!
//! Both checks run before any payment-session request is built, so a
//! refused attempt never reaches Stripe.

use thiserror::Error;

use crate::cart::CartEntry;
use crate::models::SignedInCustomer;

/// Reasons a checkout attempt stops short of a Stripe redirect.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// Visitor is not signed in.
    #[error("checkout requires a signed-in customer")]
    NotAuthenticated,

    /// Cart holds no items.
    #[error("checkout requires a non-empty cart")]
    EmptyCart,

    /// Stripe could not be reached or rejected the session request.
    #[error("payment service unavailable")]
    PaymentServiceUnavailable,
}

/// Verify that a checkout attempt may proceed.
///
/// Authentication is checked before cart contents, so an anonymous
/// visitor with an empty cart is sent to log in first.
///
/// # Errors
///
/// Returns `NotAuthenticated` if no customer is signed in, `EmptyCart`
/// if the cart holds no items.
pub fn authorize(
    customer: Option<&SignedInCustomer>,
    entries: &[CartEntry],
) -> Result<(), CheckoutError> {
    if customer.is_none() {
        return Err(CheckoutError::NotAuthenticated);
    }

    if entries.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    Ok(())
}
