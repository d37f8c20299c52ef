//! Session Gate
//!
//! Request-interception layer placed in front of the notes app.
//!
//! Clean Architecture structure:
//! - `domain/` - Route table, matcher, session state, provider traits
//! - `application/` - Configuration and the session-resolution use case
//! - `infra/` - Hosted auth provider client and session cookie codec
//! - `presentation/` - Middleware, cookie adapter, redirect, security headers
//!
//! ## Security Model
//! - Exactly one session lookup per protected request
//! - Provider faults count as "no session" and end in a login redirect
//! - Cookies written by the provider are rewritten `HttpOnly; SameSite=Lax; Path=/`,
//!   plus `Secure` in production
//! - `x-user-id` is only ever set by the gate; inbound copies are dropped

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GateConfig;
pub use domain::matcher::RouteMatcher;
pub use domain::provider::{AuthProvider, ProviderError};
pub use domain::route_table::ProtectedRoutes;
pub use domain::session::{AuthState, Session, UserId};
pub use error::{ConfigError, GateError, GateResult};
pub use infra::supabase::{SupabaseAuthProvider, SupabaseConfig};
pub use presentation::middleware::{GateState, IDENTITY_HEADER, protect, session_gate};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
