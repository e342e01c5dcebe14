//! Errors are converted to JSON responses with a status code chosen by error class.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{ErrorClass, SqlGatewayError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing, mistyped or disallowed request input (400)
    InvalidInput { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Statement deadline passed (503)
    Timeout { detail: Option<String> },

    /// Write outcome unknown (500)
    AmbiguousWrite { detail: Option<String> },

    /// Anything else (500, logged)
    Internal { detail: Option<String> },
}

impl ApiError {
    /// Classify a gateway error. Driver text is logged here and kept in the body only when
    /// `verbose` is set.
    #[must_use]
    pub fn from_gateway(err: SqlGatewayError, verbose: bool) -> Self {
        let detail = verbose.then(|| err.to_string());
        match err.class() {
            ErrorClass::InvalidInput => {
                tracing::debug!(error = %err, "rejected request");
                Self::InvalidInput {
                    message: err.to_string(),
                }
            }
            ErrorClass::Timeout => {
                tracing::warn!(error = %err, "statement timed out");
                Self::Timeout { detail }
            }
            ErrorClass::AmbiguousWrite => {
                tracing::error!(error = %err, "write outcome unknown");
                Self::AmbiguousWrite { detail }
            }
            ErrorClass::Database | ErrorClass::Projection | ErrorClass::Internal => {
                tracing::error!(error = %err, "request failed");
                Self::Internal { detail }
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::AmbiguousWrite { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            Self::InvalidInput { message } => ("invalid_input", message),
            Self::NotFound { resource, id } => ("not_found", format!("{resource} '{id}' not found")),
            Self::Timeout { detail } => (
                "timeout",
                detail.unwrap_or_else(|| "the database did not answer in time".into()),
            ),
            Self::AmbiguousWrite { detail } => (
                "ambiguous_write",
                detail.unwrap_or_else(|| "the change may or may not have been saved".into()),
            ),
            Self::Internal { detail } => (
                "internal_error",
                detail.unwrap_or_else(|| "an internal error occurred".into()),
            ),
        };

        (
            status,
            Json(json!({
                "result": "fail",
                "error": code,
                "message": message
            })),
        )
            .into_response()
    }
}
