//! Authentication failure cases.
//!
//! The first five variants are expected outcomes of people typing things;
//! routes turn them into notice redirects. The last two are real faults.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted email failed structural validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] savory_core::EmailError),

    /// Registration attempted with an email that already has an account.
    #[error("email already registered")]
    EmailTaken,

    /// Login attempted with an email that has no account.
    #[error("no account for this email")]
    UnknownEmail,

    /// Login attempted with a password that does not match.
    #[error("wrong password")]
    WrongPassword,

    /// The submitted password fails the length policy.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The customer repository failed underneath us.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Argon2 could not hash or parse a stored hash.
    #[error("password hashing error")]
    PasswordHash,
}
