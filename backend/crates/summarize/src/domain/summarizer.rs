//! Summarizer Trait

use crate::error::SummarizeResult;

/// Turns a long text into a short one
#[trait_variant::make(Summarizer: Send)]
pub trait LocalSummarizer {
    async fn summarize(&self, text: &str) -> SummarizeResult<String>;
}
