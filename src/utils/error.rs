//! Error types and handling
//!
//! `BenefitError` covers the aggregation core and its data collaborators.
//! `AppError` is the HTTP-facing error; every variant renders the same JSON
//! error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised by the benefit pipeline and its collaborators
#[derive(Debug, Error)]
pub enum BenefitError {
    /// A record's machine identifier could not be turned into a join key.
    /// The record is skipped; the run continues.
    #[error("Malformed identifier '{identifier}': {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    /// A data collaborator failed (transport or permission). Aborts the run.
    #[error("Failed to fetch {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    /// A rate override source could not be parsed. Defaults are used.
    #[error("Failed to parse {origin}: {message}")]
    ConfigParse { origin: String, message: String },
}

impl BenefitError {
    pub fn malformed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        BenefitError::MalformedIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn fetch(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        BenefitError::Fetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn config_parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        BenefitError::ConfigParse {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BenefitError {
    fn from(err: reqwest::Error) -> Self {
        let source_name = err
            .url()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| "remote service".to_string());

        if err.is_timeout() {
            BenefitError::fetch(source_name, "request timed out")
        } else if err.is_connect() {
            BenefitError::fetch(source_name, "failed to connect")
        } else {
            BenefitError::fetch(source_name, err.to_string())
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };

        debug!(error = %self, error_type = error_type, "Request rejected");

        let body = ErrorResponse::new(error_type, self.to_string());

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
