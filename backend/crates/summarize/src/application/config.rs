//! Application Configuration
//!
//! Inference endpoint and generation parameters.

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Summarize configuration
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    /// Model endpoint
    pub api_url: String,
    /// Bearer token for the inference API
    pub api_key: String,
    /// Longest summary, in model tokens
    pub max_length: u32,
    /// Shortest summary, in model tokens
    pub min_length: u32,
    /// Greedy decoding when false
    pub do_sample: bool,
}

impl SummarizeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            max_length: 150,
            min_length: 30,
            do_sample: false,
        }
    }

    /// `HUGGINGFACE_API_KEY` is required, `HUGGINGFACE_API_URL` overrides the
    /// model endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("HUGGINGFACE_API_KEY")
            .or_else(|_| std::env::var("NEXT_PUBLIC_HUGGINGFACE_API_KEY"))
            .map_err(|_| ConfigError::Missing("HUGGINGFACE_API_KEY"))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "HUGGINGFACE_API_KEY",
                reason: "must not be empty".to_string(),
            });
        }

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("HUGGINGFACE_API_URL") {
            config.api_url = url;
        }

        Ok(config)
    }
}
