//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database
//! row types and template view models.

pub mod customer;
pub mod meal;
pub mod session;

pub use customer::Customer;
pub use meal::Meal;
pub use session::SignedInCustomer;
pub use session::keys as session_keys;
