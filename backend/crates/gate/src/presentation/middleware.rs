//! Session Gate Middleware
//!
//! Runs once per matched request. Protected paths need a session: with one the
//! request goes through carrying `x-user-id`, without one it is redirected to
//! the login page. Every response the gate shapes carries the security headers
//! and any cookies the provider rewrote.

use crate::application::config::GateConfig;
use crate::application::resolve_session::ResolveSessionUseCase;
use crate::domain::provider::AuthProvider;
use crate::domain::session::AuthState;
use crate::error::GateError;
use crate::presentation::cookies::RequestCookieStore;
use crate::presentation::redirect::build_login_redirect;
use crate::presentation::security_headers;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

pub use platform::identity::IDENTITY_HEADER;

/// Middleware state
pub struct GateState<P>
where
    P: AuthProvider + Send + Sync + 'static,
{
    pub provider: Arc<P>,
    pub config: Arc<GateConfig>,
}

impl<P> Clone for GateState<P>
where
    P: AuthProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P> GateState<P>
where
    P: AuthProvider + Send + Sync + 'static,
{
    pub fn new(provider: P, config: GateConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config: Arc::new(config),
        }
    }
}

/// What the gate decided for a request it evaluated successfully.
enum Decision {
    Forward {
        identity: Option<HeaderValue>,
        cookies: Vec<HeaderValue>,
    },
    Redirect(Response),
}

/// An internal fault, plus the cookie writes the provider made before it.
///
/// A refresh may already have rotated the refresh token upstream, so these
/// writes go out on whatever response the fault ends in.
struct Failure {
    error: GateError,
    cookies: Vec<HeaderValue>,
}

impl Failure {
    fn new(error: GateError, cookies: Vec<HeaderValue>) -> Self {
        Self { error, cookies }
    }
}

impl From<GateError> for Failure {
    fn from(error: GateError) -> Self {
        Self::new(error, Vec::new())
    }
}

/// Wrap `router` with the session gate.
pub fn protect<P>(router: Router, state: GateState<P>) -> Router
where
    P: AuthProvider + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(state, session_gate::<P>))
}

/// Session gate
pub async fn session_gate<P>(
    State(state): State<GateState<P>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    P: AuthProvider + Send + Sync + 'static,
{
    // a client-supplied identity is never trusted, matched or not
    if req.headers_mut().remove(IDENTITY_HEADER).is_some() {
        tracing::warn!(path = %req.uri().path(), "Dropped client-supplied identity header");
    }

    let path = req.uri().path().to_owned();
    if !state.config.matcher.matches(&path) {
        return next.run(req).await;
    }

    let cookies = RequestCookieStore::from_headers(req.headers(), state.config.cookie_policy());

    match evaluate(&state, &path, cookies).await {
        Ok(Decision::Forward { identity, cookies }) => {
            if let Some(identity) = &identity {
                req.headers_mut().insert(IDENTITY_HEADER, identity.clone());
            }

            let mut res = next.run(req).await;
            let headers = res.headers_mut();
            security_headers::apply(headers);
            if let Some(identity) = identity {
                headers.insert(IDENTITY_HEADER, identity);
            }
            append_cookies(headers, cookies);
            res
        }
        Ok(Decision::Redirect(mut res)) => {
            security_headers::apply(res.headers_mut());
            res
        }
        Err(Failure { error, cookies }) => {
            error.log(&path);
            let mut res = if state.config.fails_closed(&path) {
                tracing::warn!(path = %path, "Gate failed closed");
                fail_closed(&state.config, &path)
            } else {
                tracing::warn!(path = %path, "Gate failed open");
                next.run(req).await
            };
            append_cookies(res.headers_mut(), cookies);
            res
        }
    }
}

async fn evaluate<P>(
    state: &GateState<P>,
    path: &str,
    mut cookies: RequestCookieStore,
) -> Result<Decision, Failure>
where
    P: AuthProvider + Send + Sync + 'static,
{
    if !state.config.protected_routes.is_protected(path) {
        return Ok(Decision::Forward {
            identity: None,
            cookies: Vec::new(),
        });
    }

    let use_case = ResolveSessionUseCase::new(state.provider.clone());
    let auth_state = use_case.execute(&mut cookies).await;
    let set_cookies = cookies.into_header_values()?;

    match auth_state {
        AuthState::Authenticated(session) => {
            match HeaderValue::from_str(session.user_id.as_str()) {
                Ok(identity) => Ok(Decision::Forward {
                    identity: Some(identity),
                    cookies: set_cookies,
                }),
                Err(_) => Err(Failure::new(
                    GateError::InvalidIdentity(session.user_id.to_string()),
                    set_cookies,
                )),
            }
        }
        AuthState::Unauthenticated | AuthState::Unchecked => {
            tracing::debug!(path = %path, "No session for protected route, redirecting to login");
            match build_login_redirect(&state.config, path) {
                Ok(mut res) => {
                    append_cookies(res.headers_mut(), set_cookies);
                    Ok(Decision::Redirect(res))
                }
                Err(e) => Err(Failure::new(e, set_cookies)),
            }
        }
    }
}

fn fail_closed(config: &GateConfig, path: &str) -> Response {
    let mut res = match build_login_redirect(config, path) {
        Ok(res) => res,
        Err(e) => {
            e.log(path);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };
    security_headers::apply(res.headers_mut());
    res
}

fn append_cookies(headers: &mut HeaderMap, cookies: Vec<HeaderValue>) {
    for cookie in cookies {
        headers.append(header::SET_COOKIE, cookie);
    }
}
