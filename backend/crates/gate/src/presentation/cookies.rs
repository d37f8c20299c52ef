//! Request Cookie Adapter
//!
//! The one [`CookieStore`] implementation: reads the incoming request's
//! cookie jar and records every write the provider makes, rewritten through
//! the hardened [`CookiePolicy`].

use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::CookieJar;
use platform::cookie::{CookiePolicy, set_cookie_header};

use crate::domain::cookie_store::{CookieOptions, CookieStore};
use crate::error::{GateError, GateResult};

/// Cookie store bound to a single request/response pair.
#[derive(Debug)]
pub struct RequestCookieStore {
    jar: CookieJar,
    policy: CookiePolicy,
    /// (name, rendered Set-Cookie), one entry per name
    writes: Vec<(String, String)>,
}

impl RequestCookieStore {
    pub fn new(jar: CookieJar, policy: CookiePolicy) -> Self {
        Self {
            jar,
            policy,
            writes: Vec::new(),
        }
    }

    pub fn from_headers(headers: &HeaderMap, policy: CookiePolicy) -> Self {
        Self::new(CookieJar::from_headers(headers), policy)
    }

    /// Last write for a name wins.
    fn record(&mut self, name: &str, rendered: String) {
        self.writes.retain(|(existing, _)| existing != name);
        self.writes.push((name.to_string(), rendered));
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Rendered writes as `Set-Cookie` header values.
    pub fn into_header_values(self) -> GateResult<Vec<HeaderValue>> {
        self.writes
            .into_iter()
            .map(|(name, rendered)| {
                set_cookie_header(&rendered).map_err(|_| GateError::InvalidCookie(name))
            })
            .collect()
    }
}

impl CookieStore for RequestCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.get(name).map(|cookie| cookie.value().to_string())
    }

    fn set(&mut self, name: &str, value: &str, options: CookieOptions) {
        let rendered = self.policy.render_set(name, value, &options);
        self.record(name, rendered);
    }

    fn remove(&mut self, name: &str, _options: CookieOptions) {
        let rendered = self.policy.render_removal(name);
        self.record(name, rendered);
    }
}
