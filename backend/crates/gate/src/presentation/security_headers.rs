//! Security-related response headers.
//!
//! Fixed set, applied by direct assignment to every response the gate
//! produces. Assignment overrides whatever a downstream handler set.

use axum::http::HeaderMap;
use axum::http::header::{HeaderName, HeaderValue};

pub const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "permissions-policy",
        "camera=(), microphone=(), geolocation=()",
    ),
];

/// Assign all security headers on `headers`.
pub fn apply(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}
