//! Customer domain type.

use chrono::{DateTime, Utc};

use savory_core::{CustomerId, Email};

/// A registered customer (domain type).
///
/// The password hash deliberately lives outside this type; it is only
/// surfaced by [`crate::db::CustomerRepository::get_password_hash`].
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Display name shown in the navigation bar.
    pub name: String,
    /// Customer's email address (unique per account).
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
