//! Summarize Router

use crate::domain::summarizer::Summarizer;
use crate::presentation::handlers::{self, SummarizeAppState};
use axum::{Router, routing::post};
use std::sync::Arc;

/// Create a summarize router for any summarizer implementation
pub fn summarize_router_generic<S>(summarizer: S) -> Router
where
    S: Summarizer + Send + Sync + 'static,
{
    let state = SummarizeAppState {
        summarizer: Arc::new(summarizer),
    };

    Router::new()
        .route("/api/summarize", post(handlers::summarize::<S>))
        .with_state(state)
}
