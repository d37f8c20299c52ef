//! Application Configuration
//!
//! Configuration for the gate. Built once at startup, never mutated.

use platform::cookie::CookiePolicy;
use platform::env::DeploymentMode;

use crate::domain::matcher::RouteMatcher;
use crate::domain::route_table::ProtectedRoutes;
use crate::error::ConfigError;

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Prefixes that require a session
    pub protected_routes: ProtectedRoutes,
    /// Paths the gate runs on at all
    pub matcher: RouteMatcher,
    /// Where unauthenticated requests are sent
    pub login_path: String,
    /// Query parameter carrying the original path
    pub redirect_param: String,
    /// Controls the `Secure` cookie attribute
    pub deployment: DeploymentMode,
    /// Prefixes that redirect to login on unexpected errors instead of
    /// passing through
    pub fail_closed_prefixes: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_routes: ProtectedRoutes::default(),
            matcher: RouteMatcher::default(),
            login_path: "/login".to_string(),
            redirect_param: "redirectedFrom".to_string(),
            deployment: DeploymentMode::Production,
            fail_closed_prefixes: vec!["/notes".to_string()],
        }
    }
}

impl GateConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            deployment: DeploymentMode::Development,
            ..Default::default()
        }
    }

    /// Load deployment mode and overrides from the environment.
    ///
    /// `GATE_FAIL_CLOSED_PREFIXES` is comma separated; every entry must start
    /// with `/`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            deployment: DeploymentMode::from_env(),
            ..Default::default()
        };

        if let Ok(raw) = std::env::var("GATE_FAIL_CLOSED_PREFIXES") {
            config.fail_closed_prefixes = parse_prefixes(&raw)?;
        }

        Ok(config)
    }

    /// Policy applied to every cookie the auth provider writes.
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::hardened(self.deployment.is_production())
    }

    /// Whether an unexpected error on `path` should redirect to login.
    pub fn fails_closed(&self, path: &str) -> bool {
        self.fail_closed_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

fn parse_prefixes(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('/') {
                Ok(s.to_string())
            } else {
                Err(ConfigError::Invalid {
                    key: "GATE_FAIL_CLOSED_PREFIXES",
                    reason: format!("`{s}` must start with `/`"),
                })
            }
        })
        .collect()
}
