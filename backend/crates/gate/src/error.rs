//! Gate Error Types
//!
//! `GateError` covers faults inside the gate itself. Auth provider faults
//! live in [`ProviderError`](crate::domain::provider::ProviderError) and never
//! become a `GateError`: they are folded into "unauthenticated".

use kernel::error::kind::ErrorKind;
use thiserror::Error;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Unexpected faults while processing a request.
///
/// Every variant ends in either a login redirect or a pass-through without
/// gate headers, depending on the request path.
#[derive(Debug, Error)]
pub enum GateError {
    /// The resolved user id cannot be carried in a header
    #[error("User id is not a valid header value: {0}")]
    InvalidIdentity(String),

    /// A cookie the provider wrote cannot be encoded as Set-Cookie
    #[error("Cookie `{0}` is not a valid Set-Cookie value")]
    InvalidCookie(String),

    /// The login redirect location cannot be encoded
    #[error("Invalid redirect location: {0}")]
    InvalidRedirect(String),
}

impl GateError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InternalServerError
    }

    /// Log the error with appropriate level
    pub fn log(&self, path: &str) {
        tracing::error!(path = %path, kind = %self.kind(), error = %self, "Gate error");
    }
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Invalid route pattern: {0}")]
    InvalidPattern(String),
}
