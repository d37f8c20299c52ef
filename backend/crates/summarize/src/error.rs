//! Summarize Error Types
//!
//! Summarize-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Summarize-specific result type alias
pub type SummarizeResult<T> = Result<T, SummarizeError>;

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Request did not come through the session gate
    #[error("Missing user identity")]
    MissingIdentity,

    /// Nothing to summarize
    #[error("Text must not be empty")]
    EmptyInput,

    /// Inference API could not be reached
    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Inference API answered with a non-success status
    #[error("Inference API returned status {status}")]
    Upstream { status: u16 },

    /// Inference API answered with something we could not decode
    #[error("Malformed inference response: {0}")]
    Malformed(String),

    /// Inference API answered with no summaries
    #[error("Inference API returned no summary")]
    EmptySummary,
}

impl SummarizeError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummarizeError::MissingIdentity => ErrorKind::Unauthorized,
            SummarizeError::EmptyInput => ErrorKind::BadRequest,
            SummarizeError::Request(e) => {
                if e.is_timeout() {
                    ErrorKind::GatewayTimeout
                } else if e.is_connect() {
                    ErrorKind::ServiceUnavailable
                } else {
                    ErrorKind::BadGateway
                }
            }
            SummarizeError::Upstream { .. }
            | SummarizeError::Malformed(_)
            | SummarizeError::EmptySummary => ErrorKind::BadGateway,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SummarizeError::MissingIdentity => {
                tracing::warn!("Summarize request without gate identity");
            }
            SummarizeError::EmptyInput => {
                tracing::debug!(error = %self, "Summarize rejected");
            }
            _ => {
                tracing::error!(error = %self, "Error summarizing text");
            }
        }
    }
}

impl From<SummarizeError> for AppError {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::Request(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for SummarizeError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
