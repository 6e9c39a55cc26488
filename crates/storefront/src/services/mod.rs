//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration and login (argon2 password hashing)
//! - `checkout` - Checkout preconditions
//! - `stripe` - Stripe hosted-checkout client

pub mod auth;
pub mod checkout;
pub mod stripe;
