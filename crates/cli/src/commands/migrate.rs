//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! savory migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SAVORY_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/storefront/migrations/` and are embedded
//! into the binary at compile time, so the CLI can run from any directory.

use sqlx::PgPool;
use thiserror::Error;

/// Ways `savory migrate` can fail.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Neither `SAVORY_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Could not connect to the database.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

fn database_url() -> Result<String, MigrationError> {
    std::env::var("SAVORY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("SAVORY_DATABASE_URL"))
}
