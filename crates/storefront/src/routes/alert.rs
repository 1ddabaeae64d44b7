//! Alert fragments.
//!
//! Alerts are how the storefront talks to the visitor about the outcome of an
//! action: units added, invalid quantity, empty-cart checkout. They are
//! swapped into the page's `#alerts` region.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{AppendHeaders, IntoResponse, Response};

/// Target region for alert fragments.
pub const ALERTS_TARGET: &str = "#alerts";

/// Visual severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Error,
}

impl AlertLevel {
    /// CSS class suffix used by the templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Alert fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/alert.html")]
pub struct AlertTemplate {
    pub level: AlertLevel,
    pub message: String,
}

impl AlertTemplate {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }

    /// Respond with this alert regardless of the requesting element's target.
    #[must_use]
    pub fn retargeted(self) -> Response {
        (
            AppendHeaders([("HX-Retarget", ALERTS_TARGET), ("HX-Reswap", "innerHTML")]),
            self,
        )
            .into_response()
    }
}
