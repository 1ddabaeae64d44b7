//! Error responses and Sentry reporting.
//!
//! Handlers return [`Result`]. Failures of the session store or the cart
//! codec are ours and surface as a bare 500 after being sent to Sentry;
//! the rest describe a request that does not fit the visitor's state.
//!
//! Problems the visitor can fix themselves (an invalid quantity, an empty
//! cart at checkout) are not errors here: they are rendered as alert
//! fragments by the routes.

use std::fmt::Display;

use almacen_core::CheckoutError;
use almacen_core::persist::PersistError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything a storefront handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing the visitor's session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Encoding the cart for storage failed.
    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    /// No such catalog entry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stale or repeated checkout confirmation.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
            return (status, "Internal server error").into_response();
        }

        tracing::info!(status = status.as_u16(), reason = %self, "Request refused");
        (status, self.to_string()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a visitor action as a Sentry breadcrumb.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", &[("product_id", &product.id)]);
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &dyn Display)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.to_string().into()))
            .collect(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_failure() -> AppError {
        AppError::Session(tower_sessions::session::Error::Store(
            tower_sessions::session_store::Error::Backend("down".to_string()),
        ))
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("catalog item 9".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("stale".to_string()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            session_failure().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_errors_are_conflicts() {
        for err in [CheckoutError::TokenMismatch, CheckoutError::NoPendingCheckout] {
            let app_err = AppError::from(err);
            assert_eq!(app_err.status(), StatusCode::CONFLICT);
            assert!(app_err.to_string().starts_with("Conflict: "));
        }
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = session_failure().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        assert_eq!(body, "Internal server error");
    }
}
