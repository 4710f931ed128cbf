//! Integration tests for ShopVerse.
//!
//! The storefront keeps every bit of state in process memory (session store,
//! catalog, viewer scenes), so these tests drive the real router in-process
//! through `tower::ServiceExt::oneshot`. No server, database, or environment
//! setup needs to be running.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopverse-integration-tests
//! ```
//!
//! [`TestApp`] builds the same router `main` does (minus the Sentry and
//! static-file layers) and carries the session cookie between requests, so a
//! test reads like one visitor's browsing session.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Test helpers panic to fail the calling test instead of returning errors.
#![allow(clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header, request::Builder};
use axum::response::Response;
use axum::routing::get;
use secrecy::SecretString;
use tower::ServiceExt;

use shopverse_core::viewer::{NullXrRuntime, XrRuntime};
use shopverse_storefront::config::StorefrontConfig;
use shopverse_storefront::middleware::{create_session_layer, request_id_middleware};
use shopverse_storefront::routes;
use shopverse_storefront::state::AppState;

/// Upper bound when collecting a response body.
const BODY_LIMIT: usize = 1 << 20;

/// A storefront configuration that never touches the environment.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        session_secret: SecretString::from("kJ8#mN2$pQ9@vX4&wZ7!bC5^dF3*gH6%"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// One visitor's browser against an in-process storefront.
///
/// Requests share the session: the first `Set-Cookie` is remembered and sent
/// back on every following request, the way a browser would.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront with the default XR runtime (AR reports unsupported).
    #[must_use]
    pub fn new() -> Self {
        Self::with_xr(Arc::new(NullXrRuntime))
    }

    /// Storefront with a caller-supplied XR runtime, for AR session flows.
    #[must_use]
    pub fn with_xr(xr: Arc<dyn XrRuntime>) -> Self {
        let config = test_config();
        let session_layer = create_session_layer(&config);
        let state = AppState::with_xr(config, xr).expect("test config is a valid state");

        let router = Router::new()
            .route("/health", get(health))
            .merge(routes::routes())
            .layer(session_layer)
            .layer(axum::middleware::from_fn(request_id_middleware))
            .with_state(state);

        Self {
            router,
            cookie: None,
        }
    }

    pub async fn get(&mut self, path: &str) -> Response {
        let request = self
            .builder("GET", path)
            .body(Body::empty())
            .expect("request builds");
        self.send(request).await
    }

    /// GET with the HTMX marker header, as a fragment swap would send.
    pub async fn get_htmx(&mut self, path: &str) -> Response {
        let request = self
            .builder("GET", path)
            .header("hx-request", "true")
            .body(Body::empty())
            .expect("request builds");
        self.send(request).await
    }

    /// Plain form post, the no-script fallback path.
    pub async fn post_form(&mut self, path: &str, form: &str) -> Response {
        let request = self
            .builder("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .expect("request builds");
        self.send(request).await
    }

    /// Form post with the HTMX marker header; handlers answer with fragments.
    pub async fn post_form_htmx(&mut self, path: &str, form: &str) -> Response {
        let request = self
            .builder("POST", path)
            .header("hx-request", "true")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .expect("request builds");
        self.send(request).await
    }

    /// JSON post, as `navigator.sendBeacon` delivers the visibility beacon.
    pub async fn post_json(&mut self, path: &str, value: &serde_json::Value) -> Response {
        let request = self
            .builder("POST", path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request builds");
        self.send(request).await
    }

    /// Plain form post carrying a Referer, for redirect-back assertions.
    pub async fn post_form_from(&mut self, path: &str, form: &str, referer: &str) -> Response {
        let request = self
            .builder("POST", path)
            .header(header::REFERER, referer)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .expect("request builds");
        self.send(request).await
    }

    fn builder(&self, method: &str, path: &str) -> Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> Response {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails");
        self.remember_cookie(&response);
        response
    }

    /// Keep the `name=value` pair of a freshly issued session cookie.
    fn remember_cookie(&mut self, response: &Response) {
        let pair = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| raw.split(';').next())
            .map(str::to_owned);
        if let Some(pair) = pair {
            self.cookie = Some(pair);
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Collect a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("body stays under the collection limit");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A response header as text, if present and valid.
#[must_use]
pub fn header_text<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

/// Pull the coin balance out of a rendered coin badge.
#[must_use]
pub fn coin_balance(body: &str) -> i64 {
    body.split(r#"class="coin-value">"#)
        .nth(1)
        .and_then(|rest| rest.split('<').next())
        .and_then(|digits| digits.trim().parse().ok())
        .unwrap_or_else(|| panic!("no coin badge in body: {body}"))
}
