//! Database access for the storefront.
//!
//! Three tables, one concern each:
//!
//! - `meal` - the menu, read into the in-memory catalog at boot
//! - `customer` - accounts with Argon2id password hashes
//! - `session` - tower-sessions storage (lives in the `tower_sessions` schema)
//!
//! Carts never touch the database; they live in the in-memory cart store
//! and expire with the session. Apply migrations with
//! `cargo run -p savory-cli -- migrate` before starting the server.

pub mod customers;
pub mod meals;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use meals::MealRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The driver reported a failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row violates an invariant the application relies on.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation (duplicate email or meal name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Open a connection pool sized for a single small web process.
///
/// # Errors
///
/// Returns `sqlx::Error` when `PostgreSQL` refuses the connection.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url.expose_secret())
        .await
}
