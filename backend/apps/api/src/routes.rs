//! Application Routes
//!
//! Page shells for the notes app. Note storage and the login form live in the
//! hosted backend and the frontend; these handlers only prove who is asking.

use axum::extract::Path;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;
use gate::{AuthProvider, GateConfig, GateState, IDENTITY_HEADER, protect};
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::kind::ErrorKind;
use summarize::{Summarizer, summarize_router_generic};
use tower_http::trace::TraceLayer;

/// Full application: pages, summarize API, session gate, access log.
pub fn app<P, S>(provider: P, gate_config: GateConfig, summarizer: S) -> Router
where
    P: AuthProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    let router = Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/notes", get(notes))
        .route("/notes/{*rest}", get(note))
        .merge(summarize_router_generic(summarizer))
        .fallback(not_found);

    protect(router, GateState::new(provider, gate_config)).layer(TraceLayer::new_for_http())
}

fn identity(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Sign in required"))
}

async fn home() -> &'static str {
    "Notes"
}

async fn login() -> &'static str {
    "Sign in to continue"
}

async fn notes(headers: HeaderMap) -> AppResult<String> {
    let user_id = identity(&headers)?;
    Ok(format!("Notes for {user_id}"))
}

async fn note(headers: HeaderMap, Path(rest): Path<String>) -> AppResult<String> {
    let user_id = identity(&headers)?;
    Ok(format!("Note {rest} for {user_id}"))
}

async fn not_found() -> AppError {
    AppError::new(ErrorKind::NotFound, "No such page")
}
