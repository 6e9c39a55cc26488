//! Validated email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Ways an address can fail to parse.
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    /// Nothing was submitted.
    #[error("email address is empty")]
    Empty,
    /// The submission exceeds the RFC 5321 length limit.
    #[error("email address is longer than {max} characters")]
    TooLong {
        /// The ceiling that was exceeded.
        max: usize,
    },
    /// No @ symbol, or an empty part on either side of it.
    #[error("email address must look like name@domain")]
    Malformed,
}

/// A structurally valid email address.
///
/// Validation is intentionally shallow: the address must fit the RFC 5321
/// length limit and have a non-empty local part and domain around a single
/// @ symbol. Deliverability is the mail server's problem, not ours.
///
/// Stored as `TEXT` when the `postgres` feature is on; database values
/// are trusted and not re-validated on the way out.
///
/// ## Examples
///
/// ```
/// use savory_core::Email;
///
/// assert!(Email::parse("diner@example.com").is_ok());
/// assert!(Email::parse("pat.lee+offers@mail.example.org").is_ok());
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("@example.com").is_err());
/// assert!(Email::parse("diner@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 length ceiling.
    pub const MAX_LEN: usize = 254;

    /// Validate and wrap an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`Email::MAX_LEN`], or not shaped like `name@domain`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LEN {
            return Err(EmailError::TooLong { max: Self::MAX_LEN });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::Malformed)?;
        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::Malformed);
        }

        Ok(Self(s.to_owned()))
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
