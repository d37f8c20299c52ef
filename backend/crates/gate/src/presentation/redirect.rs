//! Login Redirect

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use url::form_urlencoded;

use crate::application::config::GateConfig;
use crate::error::{GateError, GateResult};

/// `<login_path>?<redirect_param>=<path>` with the query form-urlencoded.
pub fn login_location(config: &GateConfig, path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(&config.redirect_param, path)
        .finish();
    format!("{}?{}", config.login_path, query)
}

/// 307 to the login page, remembering where the user was going.
pub fn build_login_redirect(config: &GateConfig, path: &str) -> GateResult<Response> {
    let location = login_location(config, path);
    let value =
        HeaderValue::from_str(&location).map_err(|_| GateError::InvalidRedirect(location.clone()))?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response())
}
