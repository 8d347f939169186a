//! Request-level errors for the storefront handlers.
//!
//! Handlers return [`Result`]. Server-side failures are reported to Sentry
//! when they turn into a response; visitor mistakes are answered with a
//! plain-text reason.
//!
//! Catalog and cart storage failures never reach this type: they degrade to
//! an empty state inside the services instead.

use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything a storefront handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Unknown product id or similar lookup miss.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed form or query input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The catalog is still loading or its load failed.
    #[error("Catalog unavailable")]
    CatalogUnavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is our fault rather than the visitor's.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Internal(_))
    }

    /// HTTP status answered for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::CatalogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Body text shown to the visitor. Server faults stay opaque.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_server_fault() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "storefront request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (self.status(), self.public_message()).into_response()
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Shorthand for handler results.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a visitor action as a Sentry breadcrumb.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let data = data
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| {
            (
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            )
        })
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_errors_keep_their_reason() {
        let err = AppError::NotFound("product 99".to_string());
        assert_eq!(err.to_string(), "Not found: product 99");
        assert_eq!(err.public_message(), "Not found: product 99");
        assert!(!err.is_server_fault());

        let err = AppError::BadRequest("unknown category".to_string());
        assert_eq!(err.public_message(), "Bad request: unknown category");
    }

    #[test]
    fn test_server_faults_are_opaque() {
        let err = AppError::Internal("serializer exploded".to_string());
        assert!(err.is_server_fault());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
            (AppError::CatalogUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                AppError::Internal("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected);
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
