//! Session Entity
//!
//! A session is owned by the external auth provider. The gate only holds
//! one for the duration of a single request.

use std::fmt;

/// Opaque user identifier issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved session for the current request.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token (never logged)
    pub access_token: String,
    pub user_id: UserId,
    /// Expiry (Unix timestamp, seconds)
    pub expires_at: i64,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user_id: UserId, expires_at: i64) -> Self {
        Self {
            access_token: access_token.into(),
            user_id,
            expires_at,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Per-request authentication state.
///
/// Starts `Unchecked` on every request and ends in one of the two terminal
/// states. Nothing carries over between requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unchecked,
    Authenticated(Session),
    Unauthenticated,
}

impl AuthState {
    /// Move from `Unchecked` to a terminal state. Terminal states are sticky.
    pub fn resolve(self, session: Option<Session>) -> Self {
        match self {
            AuthState::Unchecked => match session {
                Some(session) => AuthState::Authenticated(session),
                None => AuthState::Unauthenticated,
            },
            terminal => terminal,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            AuthState::Authenticated(session) => Some(&session.user_id),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}
