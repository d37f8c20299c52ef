//! Application Layer
//!
//! Gate configuration and the session-resolution use case.

pub mod config;
pub mod resolve_session;

// Re-exports
pub use config::GateConfig;
pub use resolve_session::ResolveSessionUseCase;
