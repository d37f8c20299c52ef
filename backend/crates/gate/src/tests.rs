//! Request-level tests for the session gate
//! Every scenario drives a real router through the middleware.

#[cfg(test)]
mod gate_tests {
    use crate::domain::cookie_store::{CookieOptions, CookieStore, SameSite};
    use crate::domain::matcher::RouteMatcher;
    use crate::domain::provider::{AuthProvider, ProviderError};
    use crate::domain::session::{Session, UserId};
    use crate::presentation::security_headers::SECURITY_HEADERS;
    use crate::{GateConfig, GateState, protect};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Method, Request, StatusCode, header};
    use axum::response::Response;
    use axum::routing::{get, post};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const SESSION_COOKIE: &str = "sb-test-auth-token";

    /// Reads `SESSION_COOKIE` as a plain user id, with a few magic values.
    #[derive(Clone, Default)]
    struct FakeProvider {
        calls: Arc<AtomicUsize>,
        rotate: bool,
    }

    impl FakeProvider {
        fn rotating() -> Self {
            Self {
                rotate: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    /// What a careless provider would ask for.
    fn weak_options() -> CookieOptions {
        CookieOptions {
            max_age_secs: Some(100),
            http_only: false,
            secure: false,
            same_site: Some(SameSite::None),
            path: Some("/notes".to_string()),
            domain: Some("example.com".to_string()),
        }
    }

    impl AuthProvider for FakeProvider {
        async fn get_session(
            &self,
            cookies: &mut (dyn CookieStore + Send),
        ) -> Result<Option<Session>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let Some(value) = cookies.get(SESSION_COOKIE) else {
                return Ok(None);
            };

            match value.as_str() {
                "expired" => {
                    cookies.remove(SESSION_COOKIE, weak_options());
                    Ok(None)
                }
                "broken" => Err(ProviderError::Upstream { status: 503 }),
                user => {
                    if self.rotate {
                        cookies.set(SESSION_COOKIE, "rotated", weak_options());
                    }
                    let user = if user == "unprintable" { "bad\nid" } else { user };
                    Ok(Some(Session::new("token", UserId::new(user), i64::MAX)))
                }
            }
        }
    }

    async fn echo_identity(headers: HeaderMap) -> String {
        headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("anonymous")
            .to_string()
    }

    fn app<P>(provider: P, config: GateConfig) -> Router
    where
        P: AuthProvider + Send + Sync + 'static,
    {
        let router = Router::new()
            .route("/", get(echo_identity))
            .route("/login", get(echo_identity))
            .route("/notes", get(echo_identity))
            .route("/notes/{*rest}", get(echo_identity))
            .route("/api/summarize", post(echo_identity));

        protect(router, GateState::new(provider, config))
    }

    fn every_path() -> GateConfig {
        GateConfig {
            matcher: RouteMatcher::all(),
            ..GateConfig::default()
        }
    }

    async fn send(app: Router, method: Method, path: &str, headers: &[(&str, &str)]) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get_with_session(app: Router, path: &str, session: &str) -> Response {
        let cookie = format!("{SESSION_COOKIE}={session}");
        send(app, Method::GET, path, &[("cookie", cookie.as_str())]).await
    }

    async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Decoded `redirectedFrom` of a login redirect.
    fn redirected_from(res: &Response) -> String {
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = res.headers()[header::LOCATION].to_str().unwrap();
        let (path, query) = location.split_once('?').unwrap();
        assert_eq!(path, "/login");
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "redirectedFrom")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    fn assert_security_headers(res: &Response) {
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(res.headers()[name], value, "header {name}");
        }
    }

    fn assert_no_security_headers(res: &Response) {
        for (name, _) in SECURITY_HEADERS {
            assert!(res.headers().get(name).is_none(), "header {name}");
        }
    }

    fn set_cookies(res: &Response) -> Vec<String> {
        res.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_notes_without_session_redirects_to_login() {
        let provider = FakeProvider::default();
        let res = send(app(provider.clone(), GateConfig::default()), Method::GET, "/notes", &[]).await;

        assert_eq!(redirected_from(&res), "/notes");
        assert_security_headers(&res);
        assert!(res.headers().get("x-user-id").is_none());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_nested_note_without_session_keeps_full_path() {
        let res = send(
            app(FakeProvider::default(), GateConfig::default()),
            Method::GET,
            "/notes/42/edit",
            &[],
        )
        .await;
        assert_eq!(redirected_from(&res), "/notes/42/edit");
    }

    #[tokio::test]
    async fn test_summarize_without_session_redirects_to_login() {
        let res = send(
            app(FakeProvider::default(), GateConfig::default()),
            Method::POST,
            "/api/summarize",
            &[],
        )
        .await;
        assert_eq!(redirected_from(&res), "/api/summarize");
        assert_security_headers(&res);
    }

    #[tokio::test]
    async fn test_public_path_gets_headers_without_session_lookup() {
        let provider = FakeProvider::default();
        let res = get_with_session(app(provider.clone(), every_path()), "/", "user-1").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_security_headers(&res);
        assert!(res.headers().get("x-user-id").is_none());
        assert!(set_cookies(&res).is_empty());
        assert_eq!(provider.calls(), 0);
        assert_eq!(body_text(res).await, "anonymous");
    }

    #[tokio::test]
    async fn test_authenticated_request_carries_identity() {
        let provider = FakeProvider::default();
        let res = get_with_session(app(provider.clone(), GateConfig::default()), "/notes/42", "user-1").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-user-id"], "user-1");
        assert_security_headers(&res);
        assert_eq!(provider.calls(), 1);
        assert_eq!(body_text(res).await, "user-1");
    }

    #[tokio::test]
    async fn test_identical_requests_get_identical_responses() {
        let app = app(FakeProvider::default(), GateConfig::default());

        let first = get_with_session(app.clone(), "/notes", "user-1").await;
        let second = get_with_session(app.clone(), "/notes", "user-1").await;
        assert_eq!(first.status(), second.status());
        assert_eq!(first.headers(), second.headers());

        let first = send(app.clone(), Method::GET, "/notes/7", &[]).await;
        let second = send(app, Method::GET, "/notes/7", &[]).await;
        assert_eq!(first.status(), second.status());
        assert_eq!(first.headers(), second.headers());
    }

    #[tokio::test]
    async fn test_rewritten_cookies_are_hardened_in_production() {
        let res = get_with_session(app(FakeProvider::rotating(), GateConfig::default()), "/notes", "user-1").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            set_cookies(&res),
            vec![format!(
                "{SESSION_COOKIE}=rotated; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=100"
            )]
        );
    }

    #[tokio::test]
    async fn test_rewritten_cookies_are_not_secure_in_development() {
        let res = get_with_session(
            app(FakeProvider::rotating(), GateConfig::development()),
            "/notes",
            "user-1",
        )
        .await;

        let cookies = set_cookies(&res);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].contains("SameSite=Lax"));
        assert!(cookies[0].contains("Path=/"));
        assert!(!cookies[0].contains("Secure"));
        assert!(!cookies[0].contains("Domain"));
    }

    #[tokio::test]
    async fn test_expired_session_redirects_and_clears_cookie() {
        let res = get_with_session(app(FakeProvider::default(), GateConfig::default()), "/notes", "expired").await;

        assert_eq!(redirected_from(&res), "/notes");
        assert_security_headers(&res);
        assert_eq!(
            set_cookies(&res),
            vec![format!(
                "{SESSION_COOKIE}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=-1"
            )]
        );
    }

    #[tokio::test]
    async fn test_provider_fault_is_treated_as_no_session() {
        let app = app(FakeProvider::default(), GateConfig::default());
        let cookie = format!("{SESSION_COOKIE}=broken");
        let res = send(app, Method::POST, "/api/summarize", &[("cookie", cookie.as_str())]).await;

        assert_eq!(redirected_from(&res), "/api/summarize");
        assert_security_headers(&res);
    }

    #[tokio::test]
    async fn test_client_identity_header_is_dropped() {
        let app = app(FakeProvider::default(), every_path());

        let res = send(app.clone(), Method::GET, "/", &[("x-user-id", "admin")]).await;
        assert!(res.headers().get("x-user-id").is_none());
        assert_eq!(body_text(res).await, "anonymous");

        let cookie = format!("{SESSION_COOKIE}=user-1");
        let res = send(
            app.clone(),
            Method::GET,
            "/notes",
            &[("cookie", cookie.as_str()), ("x-user-id", "admin")],
        )
        .await;
        assert_eq!(res.headers()["x-user-id"], "user-1");
        assert_eq!(body_text(res).await, "user-1");

        let res = send(app, Method::GET, "/notes", &[("x-user-id", "admin")]).await;
        assert_eq!(redirected_from(&res), "/notes");
    }

    #[tokio::test]
    async fn test_unmatched_path_is_untouched() {
        let provider = FakeProvider::default();
        let res = send(
            app(provider.clone(), GateConfig::default()),
            Method::GET,
            "/",
            &[("x-user-id", "admin")],
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_no_security_headers(&res);
        assert_eq!(provider.calls(), 0);
        assert_eq!(body_text(res).await, "anonymous");
    }

    #[tokio::test]
    async fn test_gate_fault_under_notes_fails_closed() {
        let res = get_with_session(
            app(FakeProvider::default(), GateConfig::default()),
            "/notes/1",
            "unprintable",
        )
        .await;

        assert_eq!(redirected_from(&res), "/notes/1");
        assert_security_headers(&res);
        assert!(res.headers().get("x-user-id").is_none());
    }

    #[tokio::test]
    async fn test_gate_fault_on_summarize_fails_open() {
        let app = app(FakeProvider::default(), GateConfig::default());
        let cookie = format!("{SESSION_COOKIE}=unprintable");
        let res = send(app, Method::POST, "/api/summarize", &[("cookie", cookie.as_str())]).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_no_security_headers(&res);
        assert!(res.headers().get("x-user-id").is_none());
        assert_eq!(body_text(res).await, "anonymous");
    }

    #[tokio::test]
    async fn test_gate_fault_failing_open_keeps_rotated_cookies() {
        let app = app(FakeProvider::rotating(), GateConfig::default());
        let cookie = format!("{SESSION_COOKIE}=unprintable");
        let res = send(app, Method::POST, "/api/summarize", &[("cookie", cookie.as_str())]).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_no_security_headers(&res);
        assert_eq!(
            set_cookies(&res),
            vec![format!(
                "{SESSION_COOKIE}=rotated; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=100"
            )]
        );
    }

    #[tokio::test]
    async fn test_gate_fault_failing_closed_keeps_rotated_cookies() {
        let res = get_with_session(
            app(FakeProvider::rotating(), GateConfig::default()),
            "/notes/1",
            "unprintable",
        )
        .await;

        assert_eq!(redirected_from(&res), "/notes/1");
        assert_eq!(set_cookies(&res).len(), 1);
        assert!(set_cookies(&res)[0].starts_with(&format!("{SESSION_COOKIE}=rotated;")));
    }

    #[tokio::test]
    async fn test_fail_closed_prefixes_are_configurable() {
        let config = GateConfig {
            fail_closed_prefixes: vec!["/notes".to_string(), "/api/summarize".to_string()],
            ..GateConfig::default()
        };
        let cookie = format!("{SESSION_COOKIE}=unprintable");
        let res = send(
            app(FakeProvider::default(), config),
            Method::POST,
            "/api/summarize",
            &[("cookie", cookie.as_str())],
        )
        .await;

        assert_eq!(redirected_from(&res), "/api/summarize");
    }
}

#[cfg(test)]
mod supabase_gate_tests {
    use crate::infra::session_cookie;
    use crate::{GateConfig, GateState, SupabaseAuthProvider, SupabaseConfig, protect};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use axum::routing::get;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "sb-test-auth-token";

    async fn echo_identity(headers: HeaderMap) -> String {
        headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("anonymous")
            .to_string()
    }

    fn app(server: &MockServer) -> Router {
        let mut config = SupabaseConfig::new(&server.uri(), "anon-key").unwrap();
        config.storage_key = KEY.to_string();
        let provider = SupabaseAuthProvider::new(config).unwrap();

        let router = Router::new().route("/notes/{*rest}", get(echo_identity));
        protect(router, GateState::new(provider, GateConfig::default()))
    }

    fn expired_cookie() -> String {
        encoded(json!({
            "access_token": "old-access",
            "refresh_token": "old-refresh",
            "expires_at": chrono::Utc::now().timestamp() - 60,
            "user": { "id": "user-1" }
        }))
    }

    fn encoded(raw: serde_json::Value) -> String {
        session_cookie::encode(&serde_json::from_value(raw).unwrap()).unwrap()
    }

    /// A cookie anyone could mint: fresh expiry, someone else's user id.
    fn minted_cookie() -> String {
        encoded(json!({
            "access_token": "made-up",
            "expires_at": 4_000_000_000i64,
            "user": { "id": "victim-user" }
        }))
    }

    fn notes_request(cookie: &str) -> Request<Body> {
        Request::builder()
            .uri("/notes/1")
            .header(header::COOKIE, format!("{KEY}={cookie}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_minted_cookie_is_rejected_by_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "msg": "invalid JWT"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let res = app(&server)
            .oneshot(notes_request(&minted_cookie()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(res.headers().get("x-user-id").is_none());
        let cookies: Vec<&str> = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(
            cookies,
            vec![format!("{KEY}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=-1")]
        );
    }

    #[tokio::test]
    async fn test_minted_cookie_without_provider_answer_is_redirected() {
        // no mocks mounted: every provider call fails
        let server = MockServer::start().await;

        let res = app(&server)
            .oneshot(notes_request(&minted_cookie()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(res.headers().get("x-user-id").is_none());
    }

    #[tokio::test]
    async fn test_fresh_cookie_identity_is_the_providers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let res = app(&server)
            .oneshot(notes_request(&minted_cookie()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-user-id"], "user-1");
    }

    fn request_with_chunks(value: &str) -> Request<Body> {
        let (first, second) = value.split_at(value.len() / 2);
        Request::builder()
            .uri("/notes/42")
            .header(header::COOKIE, format!("{KEY}.0={first}; {KEY}.1={second}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_refreshed_session_is_forwarded_with_hardened_cookies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "new-access",
                "refresh_token": "new-refresh",
                "expires_in": 3600,
                "user": { "id": "user-1" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let res = app(&server)
            .oneshot(request_with_chunks(&expired_cookie()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-user-id"], "user-1");

        let cookies: Vec<&str> = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 3);
        for cookie in &cookies {
            assert!(cookie.contains("; HttpOnly; Secure; SameSite=Lax; Path=/"));
        }
        assert!(cookies[0].starts_with(&format!("{KEY}=base64-")));
        assert!(cookies[1].starts_with(&format!("{KEY}.0=;")));
        assert!(cookies[2].starts_with(&format!("{KEY}.1=;")));
    }

    #[tokio::test]
    async fn test_rejected_refresh_redirects_and_clears_every_chunk() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant"
            })))
            .mount(&server)
            .await;

        let res = app(&server)
            .oneshot(request_with_chunks(&expired_cookie()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        let cookies: Vec<&str> = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(
            cookies,
            vec![
                format!("{KEY}.0=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=-1"),
                format!("{KEY}.1=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=-1"),
            ]
        );
    }
}
