//! Type-safe wrappers for the domain's identifiers and addresses.

pub mod email;
pub mod id;

pub use email::{Email, EmailError};
pub use id::*;
