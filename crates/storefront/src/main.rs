//! Savory storefront binary.
//!
//! Serves the customer-facing meal-ordering site: a menu read from
//! `PostgreSQL` once at boot, per-session carts held in memory, and
//! payment hand-off to Stripe Checkout. Edit the menu with the `savory`
//! CLI and restart; the running process never re-reads it.
//!
//! Listens on 127.0.0.1:4242 unless `SAVORY_HOST`/`SAVORY_PORT` say
//! otherwise.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use savory_storefront::catalog::Catalog;
use savory_storefront::config::StorefrontConfig;
use savory_storefront::db::{self, MealRepository};
use savory_storefront::middleware;
use savory_storefront::routes;
use savory_storefront::state::AppState;

/// Start Sentry when a DSN is configured.
///
/// The guard must stay alive for the life of the process; events stop
/// flowing once it drops.
fn sentry_guard(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.clone()?;

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        attach_stacktrace: true,
        ..Default::default()
    };

    Some(sentry::init((dsn, options)))
}

/// Install the tracing subscriber: env-filtered fmt output plus a Sentry
/// layer that turns warnings and errors into events and keeps info/debug
/// as breadcrumbs.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "savory_storefront=info,tower_http=debug".into());

    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    // Sentry before the subscriber so the tracing layer can feed it
    let _sentry = sentry_guard(&config);
    init_tracing();
    if config.sentry_dsn.is_some() {
        tracing::info!("Sentry error tracking enabled");
    }

    let pool = db::create_pool(&config.database_url).await?;

    // Migrations are applied by `savory migrate`, never at boot
    let meals = MealRepository::new(&pool).load_all().await?;
    let catalog = Catalog::new(meals);
    tracing::info!(meals = catalog.len(), "Menu catalog loaded");

    let state = AppState::new(config.clone(), pool, catalog)?;
    let session_layer = middleware::create_session_layer(state.pool(), state.config());

    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state)
        // Sentry layers wrap everything else so every request is covered
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Storefront accepting connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Liveness probe. Answers as long as the process is up.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe. Pings the database; 503 until it answers.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Ctrl+C handler failed to install");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler failed to install")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
