//! Auth Provider Trait
//!
//! Interface to the external auth service. Implementation is in the
//! infrastructure layer.

use kernel::error::kind::ErrorKind;
use thiserror::Error;

use crate::domain::cookie_store::CookieStore;
use crate::domain::session::Session;

/// Faults talking to the auth provider.
///
/// None of these reach the client; the gate treats them as "no session".
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, TLS or body-read failure
    #[error("Auth provider unreachable: {0}")]
    Transport(String),

    /// Provider answered with an unexpected status
    #[error("Auth provider returned status {status}")]
    Upstream { status: u16 },

    /// Provider answered with something we could not decode
    #[error("Malformed auth provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Transport(_) => ErrorKind::ServiceUnavailable,
            ProviderError::Upstream { .. } | ProviderError::Malformed(_) => ErrorKind::BadGateway,
        }
    }
}

/// External auth provider
#[trait_variant::make(AuthProvider: Send)]
pub trait LocalAuthProvider {
    /// Resolve the current session from request cookies.
    ///
    /// Any cookie the provider wants to refresh or clear goes through
    /// `cookies`. `Ok(None)` means there is no usable session.
    async fn get_session(
        &self,
        cookies: &mut (dyn CookieStore + Send),
    ) -> Result<Option<Session>, ProviderError>;
}
