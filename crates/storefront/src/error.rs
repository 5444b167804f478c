//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; clients only ever see the generic
//! message of an error, never the remote store's details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{MenuError, OrderError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Menu resolution failed.
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// Order operation failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Menu(MenuError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Menu(MenuError::Remote(_))
            | Self::Order(OrderError::Submission(_) | OrderError::Lookup(_) | OrderError::Update(_)) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Order(OrderError::InvalidRequest(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Order(OrderError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Order(OrderError::NotPersisted(_) | OrderError::InvalidTransition { .. }) => {
                StatusCode::CONFLICT
            }
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = match &self {
            Self::Menu(MenuError::Remote(_)) => "Menu is temporarily unavailable".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use corner_cafe_core::{OrderId, OrderStatus};

    use super::*;
    use crate::remote::RemoteError;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_order_errors_display_generic_messages() {
        let err = AppError::from(OrderError::Submission(RemoteError::Api {
            status: 500,
            code: Some("XX000".to_string()),
            message: "internal detail".to_string(),
        }));
        assert_eq!(err.to_string(), "Failed to create order. Please try again.");

        let err = AppError::from(OrderError::Lookup(RemoteError::Parse("bad".to_string())));
        assert_eq!(err.to_string(), "Failed to get order status. Please try again.");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status_of(MenuError::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(OrderError::InvalidRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(OrderError::NotFound(OrderId::new("o1"))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(OrderError::NotPersisted(OrderId::new("mock-1"))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(OrderError::InvalidTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::Pending,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(OrderError::Submission(RemoteError::Parse("x".to_string()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
    }
}
