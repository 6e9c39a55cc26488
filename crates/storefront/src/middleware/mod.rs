//! HTTP middleware for the storefront.
//!
//! The stack is thin: Sentry outermost, then request tracing, then the
//! session layer. Handlers see the session through the extractor in
//! [`auth`].

pub mod auth;
pub mod session;

pub use auth::{OptionalCustomer, clear_signed_in_customer, set_signed_in_customer};
pub use session::create_session_layer;
