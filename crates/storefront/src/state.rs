//! Shared handler state, one `Arc` behind a cheap `Clone`.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::stripe::{StripeClient, StripeError};

/// Everything a request handler can reach: configuration, the connection
/// pool, the in-memory menu and carts, and the Stripe client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: Catalog,
    carts: CartStore,
    stripe: StripeClient,
}

impl AppState {
    /// Assemble the shared state at boot. The cart store starts empty; the
    /// catalog arrives preloaded from the database.
    ///
    /// # Errors
    ///
    /// Fails only when the Stripe client cannot be built from its
    /// configuration.
    pub fn new(
        config: StorefrontConfig,
        pool: PgPool,
        catalog: Catalog,
    ) -> Result<Self, StripeError> {
        let stripe = StripeClient::new(&config.stripe)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                carts: CartStore::new(),
                stripe,
            }),
        })
    }

    /// Storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Postgres connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The menu, loaded once at boot.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Per-session shopping carts.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }

    /// Stripe Checkout client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }
}
