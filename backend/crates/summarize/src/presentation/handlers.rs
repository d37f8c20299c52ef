//! HTTP Handlers

use crate::application::summarize_text::SummarizeTextUseCase;
use crate::domain::summarizer::Summarizer;
use crate::error::{SummarizeError, SummarizeResult};
use crate::presentation::dto::SummarizeRequest;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use platform::identity::IDENTITY_HEADER;
use std::sync::Arc;

/// Shared state for summarize handlers
pub struct SummarizeAppState<S>
where
    S: Summarizer + Send + Sync + 'static,
{
    pub summarizer: Arc<S>,
}

impl<S> Clone for SummarizeAppState<S>
where
    S: Summarizer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            summarizer: self.summarizer.clone(),
        }
    }
}

/// POST /api/summarize
pub async fn summarize<S>(
    State(state): State<SummarizeAppState<S>>,
    headers: HeaderMap,
    Json(req): Json<SummarizeRequest>,
) -> SummarizeResult<impl IntoResponse>
where
    S: Summarizer + Send + Sync + 'static,
{
    let user_id = headers
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(SummarizeError::MissingIdentity)?;

    let use_case = SummarizeTextUseCase::new(state.summarizer.clone());
    let summary = use_case.execute(&req.text).await?;

    tracing::info!(user_id = %user_id, "Summary generated");

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        summary,
    ))
}
