//! Identity Header
//!
//! Carries the authenticated user id from the session gate to the handlers
//! behind it. Only the gate may set it; handlers read it and trust it.

use axum::http::HeaderName;

pub const IDENTITY_HEADER: HeaderName = HeaderName::from_static("x-user-id");
