//! Cookie Store Capability
//!
//! What an auth provider may do with cookies during one session lookup:
//! read from the incoming request, write or clear on the outgoing response.

pub use platform::cookie::{CookieOptions, SameSite};

/// Cookie access handed to an [`AuthProvider`](super::provider::AuthProvider).
///
/// Implementations decide what actually reaches the response; `options` is a
/// request, not a guarantee.
pub trait CookieStore {
    /// Value of `name` on the incoming request.
    fn get(&self, name: &str) -> Option<String>;

    /// Write `name=value` on the outgoing response.
    fn set(&mut self, name: &str, value: &str, options: CookieOptions);

    /// Clear `name` on the outgoing response.
    fn remove(&mut self, name: &str, options: CookieOptions);
}
