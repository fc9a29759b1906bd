//! API error handling
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thesa_core::ThesaError;
use thesa_parser::ParserError;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    InvalidVocabulary(String),
    Timeout,
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::new("UNAUTHORIZED", msg))
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
            AppError::InvalidVocabulary(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INVALID_VOCABULARY", "Vocabulary could not be read")
                    .with_details(msg),
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                ApiError::new("TIMEOUT", "Annotation took too long and was cancelled"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error().with_details(msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ThesaError> for AppError {
    fn from(err: ThesaError) -> Self {
        match err {
            ThesaError::Cancelled => AppError::Timeout,
            ThesaError::ConfigError(msg) => {
                AppError::Internal(format!("Configuration error: {msg}"))
            }
            ThesaError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ParserError> for AppError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::UnsupportedFormat(format) => {
                AppError::BadRequest(format!("Unsupported vocabulary format: {format}"))
            }
            io @ ParserError::IoError { .. } => AppError::Internal(io.to_string()),
            other => AppError::InvalidVocabulary(other.to_string()),
        }
    }
}
