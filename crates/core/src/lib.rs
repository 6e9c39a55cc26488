//! Shared domain types for Savory.
//!
//! Newtype IDs and the validated [`Email`] address, used by both the
//! storefront and the CLI. Nothing in here does I/O; database encoding
//! for the types sits behind the `postgres` feature so the crate stays
//! featherweight for consumers that never touch sqlx.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
