//! Stripe API client for hosted checkout.
//!
//! Creates Checkout Sessions via the form-encoded v1 API and hands the
//! visitor the session's redirect URL. Nothing else of Stripe's surface
//! is used; payment collection, receipts, and retries all happen on
//! Stripe's hosted page.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::cart::LineItem;
use crate::config::StripeConfig;

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com/v1";

/// Hard deadline for any single Stripe call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Ways a Stripe call can fail.
#[derive(Debug, Error)]
pub enum StripeError {
    /// The request never completed, timeouts included.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe answered with a non-success status.
    #[error("stripe returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The created session came back without a redirect URL.
    #[error("checkout session {0} has no redirect URL")]
    MissingRedirectUrl(String),

    /// Could not build the client or decode a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A checkout session request, ready for form encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    /// ISO 4217 currency code (lowercase).
    pub currency: String,
    /// Priced cart lines, in cart order.
    pub line_items: Vec<LineItem>,
    /// Where Stripe sends the visitor after payment.
    pub success_url: String,
    /// Where Stripe sends the visitor if they back out.
    pub cancel_url: String,
}

impl CheckoutSessionRequest {
    /// Build a one-time payment request with redirect URLs derived from
    /// the public base URL.
    #[must_use]
    pub fn new(line_items: Vec<LineItem>, currency: &str, base_url: &str) -> Self {
        Self {
            currency: currency.to_owned(),
            line_items,
            success_url: format!("{base_url}/order/success"),
            cancel_url: format!("{base_url}/cancel"),
        }
    }

    /// Flatten into Stripe's bracketed form-parameter encoding.
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_owned(), "payment".to_owned()),
            ("success_url".to_owned(), self.success_url.clone()),
            ("cancel_url".to_owned(), self.cancel_url.clone()),
        ];

        for (index, item) in self.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{index}][price_data][currency]"),
                self.currency.clone(),
            ));
            params.push((
                format!("line_items[{index}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            params.push((
                format!("line_items[{index}][price_data][unit_amount]"),
                item.unit_amount_cents.to_string(),
            ));
            params.push((
                format!("line_items[{index}][quantity]"),
                item.quantity.to_string(),
            ));
        }

        params
    }
}

/// Thin client for Stripe's hosted Checkout API.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
}

impl StripeClient {
    /// Build the client with the bearer token preloaded into its default
    /// headers.
    ///
    /// # Errors
    ///
    /// Fails when the secret key is not a valid header value or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StripeError::Parse(format!("secret key is not a valid header value: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Create a hosted checkout session and return its redirect URL.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or times out, the API rejects
    /// it, or the response carries no redirect URL.
    #[tracing::instrument(skip(self, request), fields(line_items = request.line_items.len()))]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{BASE_URL}/checkout/sessions");

        let response = self
            .client
            .post(&url)
            .form(&request.form_params())
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSessionResponse = response
            .json()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))?;

        let Some(redirect_url) = session.url else {
            return Err(StripeError::MissingRedirectUrl(session.id));
        };

        Ok(CheckoutSession {
            id: session.id,
            url: redirect_url,
        })
    }
}

/// Raw checkout session resource from the Stripe API.
#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
    url: Option<String>,
}

/// A created checkout session, ready to redirect to.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Stripe session ID (`cs_...`).
    pub id: String,
    /// Hosted payment page URL.
    pub url: String,
}
