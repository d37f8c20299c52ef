//! Presentation Layer
//!
//! HTTP middleware and the request/response adapters it uses.

pub mod cookies;
pub mod middleware;
pub mod redirect;
pub mod security_headers;
