//! Application error type and Sentry plumbing.
//!
//! Handlers return `Result<T, AppError>` only for genuine faults. The
//! expected failures of a shop (wrong password, sold-out meal, garbage
//! quantity input) are answered inline as notice redirects and never
//! pass through this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use savory_core::CustomerId;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// What a handler returns when a request genuinely failed.
#[derive(Debug, Error)]
pub enum AppError {
    /// A query failed underneath a handler.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// The session store failed to read or write.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// An authentication step failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// A fault with no better home.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for faults worth a Sentry event. Expected domain failures
    /// (wrong password, duplicate email) are not captured.
    fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request failed"
            );
        }

        // Clients get a safe message; the detail stays in the logs
        let (status, message) = match &self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
            ),
            Self::Auth(err) => match err {
                AuthError::UnknownEmail | AuthError::WrongPassword => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_owned())
                }
                AuthError::EmailTaken => (
                    StatusCode::CONFLICT,
                    "An account with this email already exists".to_owned(),
                ),
                AuthError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                AuthError::InvalidEmail(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid email address".to_owned())
                }
                AuthError::Repository(_) | AuthError::PasswordHash => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                ),
            },
        };

        (status, message).into_response()
    }
}

/// Handler result shorthand.
pub type Result<T> = std::result::Result<T, AppError>;

/// Attach the signed-in customer to the Sentry scope, so errors captured
/// after login carry their id and email.
pub fn set_sentry_user(customer_id: CustomerId, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

/// Detach the customer from the Sentry scope on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_source() {
        let err = AppError::Internal("pool exhausted".to_string());
        assert_eq!(err.to_string(), "internal error: pool exhausted");

        let err = AppError::Auth(AuthError::EmailTaken);
        assert_eq!(err.to_string(), "auth error: email already registered");
    }

    #[test]
    fn status_codes_follow_the_variant() {
        assert_eq!(
            AppError::Internal("test".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Auth(AuthError::EmailTaken).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Auth(AuthError::WrongPassword)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::WeakPassword("too short".to_string()))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn server_faults_are_flagged_for_capture() {
        assert!(AppError::Internal("x".to_string()).is_server_fault());
        assert!(AppError::Auth(AuthError::PasswordHash).is_server_fault());
        assert!(!AppError::Auth(AuthError::WrongPassword).is_server_fault());
    }
}
