//! Queries against the `meal` table.
//!
//! The menu is small and changes rarely, so the storefront reads it once at
//! startup (see [`crate::catalog`]). Writes happen only through the CLI
//! seeding command.

use rust_decimal::Decimal;
use sqlx::PgPool;

use savory_core::MealId;

use super::RepositoryError;
use crate::models::meal::Meal;

/// Raw `meal` row as stored in `PostgreSQL`.
#[derive(Debug, sqlx::FromRow)]
struct MealRow {
    id: MealId,
    name: String,
    price: Decimal,
}

impl TryFrom<MealRow> for Meal {
    type Error = RepositoryError;

    fn try_from(row: MealRow) -> Result<Self, Self::Error> {
        if row.price < Decimal::ZERO {
            return Err(RepositoryError::DataCorruption(format!(
                "meal {} has negative price {}",
                row.id, row.price
            )));
        }

        Ok(Self {
            id: row.id,
            name: row.name,
            price: row.price,
        })
    }
}

/// Reads and writes the menu.
pub struct MealRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MealRepository<'a> {
    /// Borrow a repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the entire menu, ordered by ID.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Database` when the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is negative.
    pub async fn load_all(&self) -> Result<Vec<Meal>, RepositoryError> {
        let rows = sqlx::query_as::<_, MealRow>(
            r"
            SELECT id, name, price
            FROM meal
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Meal::try_from).collect()
    }

    /// Insert a new meal.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when a meal with this name exists
    /// and `RepositoryError::Database` for anything else.
    pub async fn create(&self, name: &str, price: Decimal) -> Result<Meal, RepositoryError> {
        let row = sqlx::query_as::<_, MealRow>(
            r"
            INSERT INTO meal (name, price)
            VALUES ($1, $2)
            RETURNING id, name, price
            ",
        )
        .bind(name)
        .bind(price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!("meal '{name}' already exists"));
            }
            RepositoryError::Database(e)
        })?;

        Meal::try_from(row)
    }

    /// Delete every meal. Used by the seeding command's `--replace` mode.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Database` when the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM meal").execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn row_conversion_accepts_valid_price() {
        let row = MealRow {
            id: MealId::new(1),
            name: "Tomato Basil Soup".to_owned(),
            price: Decimal::new(450, 2),
        };

        let meal = Meal::try_from(row).unwrap();
        assert_eq!(meal.id, MealId::new(1));
        assert_eq!(meal.price, Decimal::new(450, 2));
    }

    #[test]
    fn row_conversion_rejects_negative_price() {
        let row = MealRow {
            id: MealId::new(2),
            name: "Broken".to_owned(),
            price: Decimal::new(-100, 2),
        };

        let err = Meal::try_from(row).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn row_conversion_accepts_zero_price() {
        let row = MealRow {
            id: MealId::new(3),
            name: "Water".to_owned(),
            price: Decimal::ZERO,
        };

        assert!(Meal::try_from(row).is_ok());
    }
}
