//! Checkout route handlers.
//!
//! Payment is delegated to Stripe's hosted page. The handlers here gate
//! the attempt, create the checkout session, and answer the success and
//! cancel callbacks Stripe redirects back to.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::derive_line_items;
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::models::SignedInCustomer;
use crate::routes::cart::get_cart_id;
use crate::routes::redirect_with_notice;
use crate::services::checkout::{self, CheckoutError};
use crate::services::stripe::CheckoutSessionRequest;
use crate::state::AppState;

/// Notice shown when checkout is attempted while signed out.
const LOGIN_REQUIRED_NOTICE: &str = "You must be signed in to checkout. Please log in!";

/// Notice shown when Stripe cannot be reached.
const PAYMENT_UNAVAILABLE_NOTICE: &str =
    "Payment service is unavailable right now. Please try again.";

/// Map a refused checkout to its redirect.
fn rejection_response(error: CheckoutError) -> Response {
    match error {
        CheckoutError::NotAuthenticated => redirect_with_notice("/login", LOGIN_REQUIRED_NOTICE),
        CheckoutError::EmptyCart => Redirect::to("/").into_response(),
        CheckoutError::PaymentServiceUnavailable => {
            redirect_with_notice("/shopping-cart", PAYMENT_UNAVAILABLE_NOTICE)
        }
    }
}

/// Start a checkout: gate it, create a Stripe session, 303 to its URL.
#[instrument(skip(state, session, customer))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
) -> crate::error::Result<Response> {
    let entries = match get_cart_id(&session).await {
        Some(cart_id) => state.carts().snapshot(cart_id).await,
        None => Vec::new(),
    };

    // No payment request is built for a refused attempt.
    if let Err(e) = checkout::authorize(customer.as_ref(), &entries) {
        tracing::debug!("Refused checkout: {e}");
        return Ok(rejection_response(e));
    }

    let priced = derive_line_items(&entries, state.catalog())
        .map_err(|e| AppError::Internal(format!("cart pricing failed: {e}")))?;

    let request = CheckoutSessionRequest::new(
        priced.line_items,
        &state.config().checkout_currency,
        &state.config().base_url,
    );

    match state.stripe().create_checkout_session(&request).await {
        Ok(checkout_session) => Ok(Redirect::to(&checkout_session.url).into_response()),
        Err(e) => {
            tracing::warn!("Failed to create checkout session: {e}");
            Ok(rejection_response(CheckoutError::PaymentServiceUnavailable))
        }
    }
}

/// Success page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct SuccessTemplate {
    pub customer: Option<SignedInCustomer>,
    pub notice: Option<String>,
}

/// Payment completed: clear the cart and thank the customer.
///
/// Stripe redirects here after payment. Idempotent; revisiting renders
/// the same page over an already-empty cart.
#[instrument(skip(state, session, customer))]
pub async fn success(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
) -> impl IntoResponse {
    if let Some(cart_id) = get_cart_id(&session).await {
        state.carts().clear(cart_id).await;
    }

    SuccessTemplate {
        customer,
        notice: None,
    }
}

/// Payment abandoned: back to the cart, contents untouched.
#[instrument]
pub async fn cancel() -> Redirect {
    Redirect::to("/shopping-cart")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[test]
    fn unauthenticated_rejection_redirects_to_login_with_notice() {
        let response = rejection_response(CheckoutError::NotAuthenticated);
        assert!(location(&response).starts_with("/login?notice="));
    }

    #[test]
    fn empty_cart_rejection_redirects_home_silently() {
        let response = rejection_response(CheckoutError::EmptyCart);
        assert_eq!(location(&response), "/");
    }

    #[test]
    fn payment_failure_redirects_back_to_cart() {
        let response = rejection_response(CheckoutError::PaymentServiceUnavailable);
        assert!(location(&response).starts_with("/shopping-cart?notice="));
    }
}
