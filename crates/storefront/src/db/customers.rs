//! Queries against the `customer` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use savory_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::customer::Customer;

/// Raw `customer` row. The password hash is selected separately so it never
/// rides along on ordinary lookups.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    name: String,
    email: Email,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerWithHashRow {
    id: CustomerId,
    name: String,
    email: Email,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl CustomerWithHashRow {
    fn into_parts(self) -> (Customer, String) {
        let customer = Customer {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        };
        (customer, self.password_hash)
    }
}

/// Reads and writes customer accounts.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Borrow a repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a customer by email, without the password hash.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Database` when the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, email, created_at
            FROM customer
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Insert a customer with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the email is taken and
    /// `RepositoryError::Database` for anything else.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customer (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(Customer::from(row))
    }

    /// Fetch a customer together with their stored password hash, for login.
    ///
    /// Returns `None` when no account has this email.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Database` when the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Customer, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerWithHashRow>(
            r"
            SELECT id, name, email, created_at, password_hash
            FROM customer
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CustomerWithHashRow::into_parts))
    }
}

/// The unique index on `customer.email` reports concurrent registrations
/// as a database error; fold that case back into [`RepositoryError::Conflict`].
fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("email already registered".to_owned());
    }
    RepositoryError::Database(e)
}
