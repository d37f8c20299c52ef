//! Resolve Session Use Case
//!
//! One explicit session lookup per request. Fails softly: provider faults are
//! logged and treated exactly like an absent session.

use std::sync::Arc;

use crate::domain::cookie_store::CookieStore;
use crate::domain::provider::AuthProvider;
use crate::domain::session::{AuthState, Session};

/// Resolve session use case
pub struct ResolveSessionUseCase<P>
where
    P: AuthProvider,
{
    provider: Arc<P>,
}

impl<P> ResolveSessionUseCase<P>
where
    P: AuthProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Current session, or `None` if absent or the provider failed.
    pub async fn resolve_session(&self, cookies: &mut (dyn CookieStore + Send)) -> Option<Session> {
        match self.provider.get_session(cookies).await {
            Ok(Some(session)) => {
                tracing::debug!(user_id = %session.user_id, "Session resolved");
                Some(session)
            }
            Ok(None) => {
                tracing::debug!("No session");
                None
            }
            Err(e) => {
                tracing::error!(kind = %e.kind(), error = %e, "Auth provider error, treating as unauthenticated");
                None
            }
        }
    }

    /// Drive the per-request state from `Unchecked` to a terminal state.
    pub async fn execute(&self, cookies: &mut (dyn CookieStore + Send)) -> AuthState {
        let session = self.resolve_session(cookies).await;
        AuthState::Unchecked.resolve(session)
    }
}
