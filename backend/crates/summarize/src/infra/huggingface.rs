//! Hugging Face Inference API
//!
//! Summarization over the hosted `bart-large-cnn` model. One request per
//! call; the first returned summary wins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::config::SummarizeConfig;
use crate::domain::summarizer::Summarizer;
use crate::error::{ConfigError, SummarizeError, SummarizeResult};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Clone)]
pub struct HuggingFaceSummarizer {
    http: reqwest::Client,
    config: Arc<SummarizeConfig>,
}

impl HuggingFaceSummarizer {
    pub fn new(config: SummarizeConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "http client",
                reason: e.to_string(),
            })?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: SummarizeConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }
}

impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str) -> SummarizeResult<String> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: self.config.max_length,
                min_length: self.config.min_length,
                do_sample: self.config.do_sample,
            },
        };

        let res = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(SummarizeError::Upstream {
                status: status.as_u16(),
            });
        }

        let items: Vec<SummaryItem> = res
            .json()
            .await
            .map_err(|e| SummarizeError::Malformed(e.to_string()))?;

        items
            .into_iter()
            .next()
            .map(|item| item.summary_text)
            .ok_or(SummarizeError::EmptySummary)
    }
}
