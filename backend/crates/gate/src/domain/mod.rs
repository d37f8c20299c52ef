//! Domain Layer - Gate vocabulary
//!
//! This layer contains:
//! - The protected-route table and the route matcher
//! - The session entity and per-request auth state
//! - The cookie-store capability and the auth-provider trait

pub mod cookie_store;
pub mod matcher;
pub mod provider;
pub mod route_table;
pub mod session;
