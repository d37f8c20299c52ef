//! Deployment Mode
//!
//! Production-only behavior (the `Secure` cookie attribute, mostly) keys off
//! this instead of `cfg!(debug_assertions)`, so a debug build can still be
//! run as production behind TLS.

/// Where the process is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
}

impl DeploymentMode {
    /// Read `APP_ENV`, then `NODE_ENV`. Anything unset or unknown is development.
    pub fn from_env() -> Self {
        std::env::var("APP_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}
