//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Home page (menu)
//! GET  /about                       - About page
//! GET  /contact                     - Contact page
//!
//! # Cart
//! GET  /update-cart/{meal_id}       - Add one of a meal, redirect home
//! GET  /shopping-cart               - Cart page with priced line items
//! GET  /update-quantity/{meal_id}   - Remove a meal from the cart
//! POST /update-quantity/{meal_id}   - Set a meal's exact quantity
//!
//! # Checkout
//! POST /create-checkout-session    - Start checkout, 303 to Stripe
//! GET  /order/success              - Payment done: clear cart, thank
//! GET  /cancel                     - Payment abandoned: back to cart
//!
//! # Auth
//! GET  /login                      - Login page
//! POST /login                      - Login action
//! GET  /register                   - Register page
//! POST /register                   - Register action
//! GET  /logout                     - Logout action
//! ```
//!
//! Expected failures (unknown meal, bad quantity, wrong password) are
//! answered with a redirect carrying a `?notice=` message, rendered as a
//! banner on the target page.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod pages;

use axum::{
    Router,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameter carrying a one-shot notice message.
#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

/// Redirect to `path` with a notice message in the query string.
pub(crate) fn redirect_with_notice(path: &str, notice: &str) -> Response {
    let target = format!("{path}?notice={}", urlencoding::encode(notice));
    Redirect::to(&target).into_response()
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        // Cart
        .route("/update-cart/{meal_id}", get(cart::add))
        .route("/shopping-cart", get(cart::show))
        .route(
            "/update-quantity/{meal_id}",
            get(cart::remove).post(cart::update_quantity),
        )
        // Checkout
        .route("/create-checkout-session", post(checkout::create))
        .route("/order/success", get(checkout::success))
        .route("/cancel", get(checkout::cancel))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_redirects_are_urlencoded() {
        let response = redirect_with_notice("/login", "You must be signed in to checkout. Please log in!");
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(location.starts_with("/login?notice="));
        assert!(!location.contains(' '));
        assert!(location.contains("signed%20in"));
    }
}
