//! Cookie Management Infrastructure
//!
//! Attribute types for cookies a collaborator asks to write, and the hardened
//! policy that decides what actually goes out in `Set-Cookie`.

use axum::http::HeaderValue;
use axum::http::header::InvalidHeaderValue;

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes a collaborator *requested* for a cookie write.
///
/// These are advisory. [`CookiePolicy`] only honours `max_age_secs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub max_age_secs: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
    pub path: Option<String>,
    pub domain: Option<String>,
}

/// Attributes every outgoing cookie is forced to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
}

/// Max-Age used for removals; any non-positive value expires immediately.
pub const EXPIRED_MAX_AGE: i64 = -1;

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::hardened(true)
    }
}

impl CookiePolicy {
    /// HttpOnly, SameSite=Lax, Path=/, and Secure only when `secure` is set.
    pub fn hardened(secure: bool) -> Self {
        Self {
            secure,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }

    /// Build Set-Cookie header value for a write.
    ///
    /// Requested `http_only`, `secure`, `same_site`, `path` and `domain` are
    /// discarded; only the requested max-age survives.
    pub fn render_set(&self, name: &str, value: &str, requested: &CookieOptions) -> String {
        self.render(name, value, requested.max_age_secs)
    }

    /// Build Set-Cookie header value that clears `name`.
    pub fn render_removal(&self, name: &str) -> String {
        self.render(name, "", Some(EXPIRED_MAX_AGE))
    }

    fn render(&self, name: &str, value: &str, max_age: Option<i64>) -> String {
        let mut cookie = format!("{}={}", name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }
}

/// Convert a rendered cookie into a header value.
pub fn set_cookie_header(rendered: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(rendered)
}
