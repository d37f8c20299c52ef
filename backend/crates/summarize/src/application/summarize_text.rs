//! Summarize Text Use Case

use std::sync::Arc;

use crate::domain::summarizer::Summarizer;
use crate::error::{SummarizeError, SummarizeResult};

/// Summarize text use case
pub struct SummarizeTextUseCase<S>
where
    S: Summarizer,
{
    summarizer: Arc<S>,
}

impl<S> SummarizeTextUseCase<S>
where
    S: Summarizer,
{
    pub fn new(summarizer: Arc<S>) -> Self {
        Self { summarizer }
    }

    pub async fn execute(&self, text: &str) -> SummarizeResult<String> {
        if text.trim().is_empty() {
            return Err(SummarizeError::EmptyInput);
        }

        let summary = self.summarizer.summarize(text).await?;
        tracing::debug!(input_len = text.len(), summary_len = summary.len(), "Text summarized");
        Ok(summary)
    }
}
