//! Authentication extractor and session helpers.
//!
//! Every page renders for anonymous visitors, so handlers take the
//! optional extractor and decide for themselves how to answer a
//! signed-out request.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{SignedInCustomer, session_keys};

/// Extracts the signed-in customer, if any. Never rejects.
///
/// ```rust,ignore
/// async fn handler(OptionalCustomer(customer): OptionalCustomer) -> impl IntoResponse {
///     match customer {
///         Some(c) => format!("Hi, {}!", c.name),
///         None => "Hi, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalCustomer(pub Option<SignedInCustomer>);

impl<S> FromRequestParts<S> for OptionalCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // SessionManagerLayer parks the session in request extensions
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        let customer = session
            .get::<SignedInCustomer>(session_keys::SIGNED_IN_CUSTOMER)
            .await
            .ok()
            .flatten();

        Ok(Self(customer))
    }
}

/// Record the customer in the session after login or registration.
///
/// # Errors
///
/// Returns an error when the session store write fails.
pub async fn set_signed_in_customer(
    session: &Session,
    customer: &SignedInCustomer,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::SIGNED_IN_CUSTOMER, customer)
        .await
}

/// Drop the customer from the session on logout.
///
/// # Errors
///
/// Returns an error when the session store write fails.
pub async fn clear_signed_in_customer(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<SignedInCustomer>(session_keys::SIGNED_IN_CUSTOMER)
        .await?;
    Ok(())
}
