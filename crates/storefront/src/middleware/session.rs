//! Session layer construction.
//!
//! Sessions live in `PostgreSQL` through tower-sessions, so a restart
//! does not sign anyone out or drop their cart id. The cookie itself
//! carries only the session id.

use sqlx::PgPool;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "savory_session";

/// Sessions die after a week without a request.
const SESSION_IDLE_DAYS: i64 = 7;

/// Build the session layer backed by the `PostgreSQL` store.
///
/// The `Secure` flag follows the configured base URL scheme, so plain
/// HTTP keeps working in local development while production cookies
/// stay HTTPS-only.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    // The backing table comes from the session migration, not from here
    let store = PostgresStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_IDLE_DAYS)))
        .with_secure(config.serves_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
