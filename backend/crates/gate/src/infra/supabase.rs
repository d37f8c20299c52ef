//! Hosted Auth Provider (Supabase GoTrue)
//!
//! Cookie-based server client. Every lookup reads the session straight from
//! the request cookies and, when it has to refresh or drop the session,
//! writes back through the [`CookieStore`]. Nothing is kept in memory and
//! nothing refreshes in the background.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;
use url::Url;

use crate::domain::cookie_store::{CookieOptions, CookieStore, SameSite};
use crate::domain::provider::{AuthProvider, ProviderError};
use crate::domain::session::{Session, UserId};
use crate::error::ConfigError;
use crate::infra::session_cookie::{self, StoredSession, StoredUser};

/// Provider default cookie lifetime (400 days)
const COOKIE_MAX_AGE_SECS: i64 = 400 * 24 * 60 * 60;

/// Connection settings for the hosted auth service
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Public (anon) API key
    pub anon_key: String,
    /// Session cookie base name
    pub storage_key: String,
    /// Refresh sessions expiring within this many seconds
    pub refresh_margin_secs: i64,
}

impl SupabaseConfig {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::Invalid {
            key: "SUPABASE_URL",
            reason: e.to_string(),
        })?;
        let project_ref = parsed
            .host_str()
            .and_then(|host| host.split('.').next())
            .filter(|label| !label.is_empty())
            .ok_or_else(|| ConfigError::Invalid {
                key: "SUPABASE_URL",
                reason: "URL has no host".to_string(),
            })?;

        Ok(Self {
            storage_key: format!("sb-{project_ref}-auth-token"),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            refresh_margin_secs: 10,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("SUPABASE_URL")
            .or_else(|_| std::env::var("NEXT_PUBLIC_SUPABASE_URL"))
            .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .or_else(|_| std::env::var("NEXT_PUBLIC_SUPABASE_ANON_KEY"))
            .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let mut config = Self::new(&base_url, anon_key)?;

        if let Ok(key) = std::env::var("SUPABASE_STORAGE_KEY") {
            config.storage_key = key;
        }

        Ok(config)
    }
}

/// Auth provider backed by the hosted auth REST API
#[derive(Clone)]
pub struct SupabaseAuthProvider {
    http: reqwest::Client,
    config: Arc<SupabaseConfig>,
}

impl SupabaseAuthProvider {
    pub fn new(config: SupabaseConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "http client",
                reason: e.to_string(),
            })?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: SupabaseConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Attributes this provider asks for. The gate overrides most of them.
    fn requested_options(&self) -> CookieOptions {
        CookieOptions {
            max_age_secs: Some(COOKIE_MAX_AGE_SECS),
            http_only: false,
            secure: false,
            same_site: Some(SameSite::Lax),
            path: Some("/".to_string()),
            domain: None,
        }
    }

    /// Exchange a refresh token. `Ok(None)` means the token was rejected.
    async fn refresh(&self, refresh_token: &str) -> Result<Option<StoredSession>, ProviderError> {
        let endpoint = format!(
            "{}/auth/v1/token?grant_type=refresh_token",
            self.config.base_url
        );

        let res = self
            .http
            .post(endpoint)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        match res.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            status if status.is_success() => res
                .json::<StoredSession>()
                .await
                .map(Some)
                .map_err(|e| ProviderError::Malformed(e.to_string())),
            status => Err(ProviderError::Upstream {
                status: status.as_u16(),
            }),
        }
    }

    /// Confirm an access token. `Ok(None)` means the provider rejected it.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<StoredUser>, ProviderError> {
        let endpoint = format!("{}/auth/v1/user", self.config.base_url);

        let res = self
            .http
            .get(endpoint)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => res
                .json::<StoredUser>()
                .await
                .map(Some)
                .map_err(|e| ProviderError::Malformed(e.to_string())),
            status => Err(ProviderError::Upstream {
                status: status.as_u16(),
            }),
        }
    }

    fn write_session(
        &self,
        cookies: &mut (dyn CookieStore + Send),
        stored: &StoredSession,
    ) -> Result<(), ProviderError> {
        let key = &self.config.storage_key;
        let value =
            session_cookie::encode(stored).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let chunks = session_cookie::chunk(key, &value);
        let stale: Vec<String> = session_cookie::existing_names(&*cookies, key)
            .into_iter()
            .filter(|name| !chunks.iter().any(|(chunk, _)| chunk == name))
            .collect();

        let options = self.requested_options();
        for (name, value) in &chunks {
            cookies.set(name, value, options.clone());
        }
        for name in stale {
            cookies.remove(&name, options.clone());
        }
        Ok(())
    }

    fn clear_session(&self, cookies: &mut (dyn CookieStore + Send)) {
        let options = CookieOptions {
            max_age_secs: Some(0),
            ..self.requested_options()
        };
        for name in session_cookie::existing_names(&*cookies, &self.config.storage_key) {
            cookies.remove(&name, options.clone());
        }
    }
}

impl AuthProvider for SupabaseAuthProvider {
    async fn get_session(
        &self,
        cookies: &mut (dyn CookieStore + Send),
    ) -> Result<Option<Session>, ProviderError> {
        let Some(raw) = session_cookie::read(&*cookies, &self.config.storage_key) else {
            return Ok(None);
        };

        let stored = match session_cookie::decode(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable session cookie");
                return Ok(None);
            }
        };

        let now = chrono::Utc::now().timestamp();

        // the cookie is client-controlled; only the provider may vouch for its user
        if stored.is_fresh(now, self.config.refresh_margin_secs) {
            return match self.fetch_user(&stored.access_token).await? {
                Some(user) => Ok(Some(Session::new(
                    stored.access_token,
                    UserId::new(user.id),
                    stored.expires_at.unwrap_or_default(),
                ))),
                None => {
                    tracing::debug!("Access token rejected, clearing session");
                    self.clear_session(cookies);
                    Ok(None)
                }
            };
        }

        if stored.refresh_token.is_empty() {
            self.clear_session(cookies);
            return Ok(None);
        }

        tracing::debug!("Session expired, refreshing");
        match self.refresh(&stored.refresh_token).await? {
            Some(refreshed) => {
                let refreshed = refreshed.with_expiry_from(now);
                self.write_session(cookies, &refreshed)?;
                Ok(Some(refreshed.into_session()))
            }
            None => {
                tracing::debug!("Refresh token rejected, clearing session");
                self.clear_session(cookies);
                Ok(None)
            }
        }
    }
}
