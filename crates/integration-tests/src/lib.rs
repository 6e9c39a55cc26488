//! Integration tests for Savory.
//!
//! The tests in `tests/` drive a running storefront over HTTP, so they are
//! all `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database, migrate, and seed the menu
//! cargo run -p savory-cli -- migrate
//! cargo run -p savory-cli -- seed menu
//!
//! # Start the storefront
//! cargo run -p savory-storefront
//!
//! # Run the integration tests
//! cargo test -p savory-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Where the storefront is listening
//!   (default: `http://localhost:4242`)

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:4242".to_string())
}

/// HTTP client that keeps session cookies and never follows redirects.
///
/// Redirects stay visible so tests can assert on status codes and
/// `Location` headers.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
