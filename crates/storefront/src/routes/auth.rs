//! Authentication route handlers.
//!
//! Registration and login against the local customer directory. A
//! successful login lands on the cart page when the visitor already has
//! items waiting, otherwise home.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error;
use crate::filters;
use crate::middleware::{OptionalCustomer, clear_signed_in_customer, set_signed_in_customer};
use crate::models::SignedInCustomer;
use crate::routes::cart::get_cart_id;
use crate::routes::{NoticeQuery, redirect_with_notice};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

const EMAIL_TAKEN_NOTICE: &str = "You've already signed up with that email, log in instead!";
const UNKNOWN_EMAIL_NOTICE: &str = "That email does not exist. Please try again.";
const WRONG_PASSWORD_NOTICE: &str = "Password incorrect. Please try again.";
const INVALID_EMAIL_NOTICE: &str = "Please enter a valid email address.";
const WEAK_PASSWORD_NOTICE: &str = "Password must be at least 8 characters long.";

// =============================================================================
// Forms
// =============================================================================

/// Fields posted from the login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Fields posted from the registration form.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Page Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub customer: Option<SignedInCustomer>,
    pub notice: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub customer: Option<SignedInCustomer>,
    pub notice: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Post-auth landing: the cart page when items are waiting, else home.
async fn post_auth_redirect(state: &AppState, session: &Session) -> Redirect {
    if let Some(cart_id) = get_cart_id(session).await
        && !state.carts().is_empty(cart_id).await
    {
        return Redirect::to("/shopping-cart");
    }

    Redirect::to("/")
}

// =============================================================================
// Login
// =============================================================================

/// Show the login page.
///
/// Already signed-in visitors are sent home.
pub async fn login_page(
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<NoticeQuery>,
) -> Response {
    if customer.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        customer: None,
        notice: query.notice,
    }
    .into_response()
}

/// Process a login attempt.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> error::Result<Response> {
    let auth = AuthService::new(state.pool());

    let customer = match auth.login(&form.email, &form.password).await {
        Ok(customer) => customer,
        // A malformed email certainly has no account
        Err(AuthError::UnknownEmail | AuthError::InvalidEmail(_)) => {
            return Ok(redirect_with_notice("/login", UNKNOWN_EMAIL_NOTICE));
        }
        Err(AuthError::WrongPassword) => {
            return Ok(redirect_with_notice("/login", WRONG_PASSWORD_NOTICE));
        }
        Err(e) => return Err(e.into()),
    };

    set_signed_in_customer(&session, &SignedInCustomer::from(&customer)).await?;
    error::set_sentry_user(customer.id, customer.email.as_str());

    Ok(post_auth_redirect(&state, &session).await.into_response())
}

// =============================================================================
// Registration
// =============================================================================

/// Show the registration page.
///
/// Already signed-in visitors are sent home.
pub async fn register_page(
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<NoticeQuery>,
) -> Response {
    if customer.is_some() {
        return Redirect::to("/").into_response();
    }

    RegisterTemplate {
        customer: None,
        notice: query.notice,
    }
    .into_response()
}

/// Process a new registration.
///
/// A taken email is pointed at the login page instead.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> error::Result<Response> {
    let auth = AuthService::new(state.pool());

    let customer = match auth
        .register(&form.name, &form.email, &form.password)
        .await
    {
        Ok(customer) => customer,
        Err(AuthError::EmailTaken) => {
            return Ok(redirect_with_notice("/login", EMAIL_TAKEN_NOTICE));
        }
        Err(AuthError::InvalidEmail(_)) => {
            return Ok(redirect_with_notice("/register", INVALID_EMAIL_NOTICE));
        }
        Err(AuthError::WeakPassword(_)) => {
            return Ok(redirect_with_notice("/register", WEAK_PASSWORD_NOTICE));
        }
        Err(e) => return Err(e.into()),
    };

    set_signed_in_customer(&session, &SignedInCustomer::from(&customer)).await?;
    error::set_sentry_user(customer.id, customer.email.as_str());

    Ok(post_auth_redirect(&state, &session).await.into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Sign the visitor out.
///
/// Ends the session and drops the visitor's cart with it.
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Some(cart_id) = get_cart_id(&session).await {
        state.carts().clear(cart_id).await;
    }

    if let Err(e) = clear_signed_in_customer(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Flush drops the whole server-side record, not just our keys
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    error::clear_sentry_user();

    Redirect::to("/").into_response()
}
