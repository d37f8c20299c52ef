//! Session Cookie Codec
//!
//! The auth provider stores its session as JSON in one cookie, or split
//! across `<key>.0`, `<key>.1`, ... when it outgrows a single cookie.
//! Current clients write `base64-` + base64url(JSON); older ones wrote raw
//! JSON.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::cookie_store::CookieStore;
use crate::domain::session::{Session, UserId};

pub const BASE64_PREFIX: &str = "base64-";

/// Largest value written to a single cookie.
pub const MAX_CHUNK_SIZE: usize = 3180;

#[derive(Debug, Error)]
pub enum SessionCookieError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid session json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session as the provider stores it. Unknown fields round-trip untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    pub user: StoredUser,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredSession {
    /// Still valid `margin_secs` from `now`. A missing expiry counts as stale.
    pub fn is_fresh(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at > now + margin_secs)
    }

    /// Token responses carry `expires_in`; fill `expires_at` from it.
    pub fn with_expiry_from(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now + secs);
        }
        self
    }

    pub fn into_session(self) -> Session {
        Session::new(
            self.access_token,
            UserId::new(self.user.id),
            self.expires_at.unwrap_or_default(),
        )
    }
}

pub fn chunk_name(key: &str, index: usize) -> String {
    format!("{key}.{index}")
}

/// Raw session value, reassembling chunks when the unchunked cookie is absent.
pub fn read<S>(store: &S, key: &str) -> Option<String>
where
    S: CookieStore + ?Sized,
{
    if let Some(value) = store.get(key) {
        return Some(value);
    }

    let mut combined = String::new();
    let mut index = 0;
    while let Some(part) = store.get(&chunk_name(key, index)) {
        combined.push_str(&part);
        index += 1;
    }

    (index > 0).then_some(combined)
}

/// Names of every session cookie currently on the request.
pub fn existing_names<S>(store: &S, key: &str) -> Vec<String>
where
    S: CookieStore + ?Sized,
{
    let mut names = Vec::new();
    if store.get(key).is_some() {
        names.push(key.to_string());
    }
    let mut index = 0;
    loop {
        let name = chunk_name(key, index);
        if store.get(&name).is_none() {
            break;
        }
        names.push(name);
        index += 1;
    }
    names
}

pub fn decode(raw: &str) -> Result<StoredSession, SessionCookieError> {
    let json = match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => String::from_utf8(URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('='))?)?,
        None => raw.to_string(),
    };
    Ok(serde_json::from_str(&json)?)
}

pub fn encode(session: &StoredSession) -> Result<String, SessionCookieError> {
    let json = serde_json::to_vec(session)?;
    Ok(format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
}

/// `(name, value)` pairs to write. Values that fit are written unchunked.
pub fn chunk(key: &str, value: &str) -> Vec<(String, String)> {
    if value.len() <= MAX_CHUNK_SIZE {
        return vec![(key.to_string(), value.to_string())];
    }

    // encoded values are ASCII, so byte chunks are char chunks
    value
        .as_bytes()
        .chunks(MAX_CHUNK_SIZE)
        .enumerate()
        .map(|(i, part)| (chunk_name(key, i), String::from_utf8_lossy(part).into_owned()))
        .collect()
}
