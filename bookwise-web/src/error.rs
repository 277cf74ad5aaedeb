//! Error types for bookwise-web
//!
//! `ApiError` answers JSON endpoints, `PageError` answers HTML pages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::pages::layout;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// bookwise-common error
    #[error("Common error: {0}")]
    Common(#[from] bookwise_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Common(bookwise_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(bookwise_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => {
                error!("API request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure while rendering an HTML page
#[derive(Debug, Error)]
pub enum PageError {
    /// Rendered as a friendly "not found" page with status 404
    #[error("{title}")]
    NotFound { title: String, message: String },

    #[error("Page error: {0}")]
    Common(#[from] bookwise_common::Error),
}

impl PageError {
    pub fn not_found(title: impl Into<String>, message: impl Into<String>) -> Self {
        PageError::NotFound {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound { title, message } => {
                let body = layout::notice("❌", &title, &message);
                (StatusCode::NOT_FOUND, layout::render_page(&title, &message, &body)).into_response()
            }
            PageError::Common(err) => {
                error!("Page render failed: {}", err);
                let body = layout::notice(
                    "⚠️",
                    "Something went wrong",
                    "The catalog could not be loaded. Please try again shortly.",
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    layout::render_page("Error", "BookWise error", &body),
                )
                    .into_response()
            }
        }
    }
}

pub type PageResult<T> = Result<T, PageError>;
