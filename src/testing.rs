//! Scenario-style helpers for exercising guarded routers without
//! sockets.
//!
//! The piece guard tests actually need is a way to pretend the
//! connection came from a particular address: [`Scenario::peer_ip`]
//! injects the [`ConnectInfo`] extension the same way
//! `into_make_service_with_connect_info` does on a live listener. A
//! scenario without a peer reproduces the misconfigured-server case.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::post, Router};
//! use telegram_webhook_guard::{testing, OnlyTelegramNetwork, TelegramGuardLayer};
//!
//! #[tokio::test]
//! async fn telegram_peers_get_through() {
//!     let app = Router::new()
//!         .route("/webhook", post(|| async { "ok" }))
//!         .route_layer(TelegramGuardLayer::new(OnlyTelegramNetwork::new()));
//!
//!     testing::post(app, "/webhook")
//!         .peer_ip("149.154.160.1")
//!         .execute()
//!         .await
//!         .assert_ok();
//! }
//! ```

use std::net::{IpAddr, SocketAddr};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

/// Test scenario builder for guarded endpoints.
pub struct Scenario {
    app: Router,
    request: Request<Body>,
}

impl Scenario {
    /// Create a new test scenario with the given app.
    ///
    /// No peer address is attached by default; call
    /// [`peer_ip`](Self::peer_ip) or [`peer_addr`](Self::peer_addr)
    /// unless the test is about the missing-connect-info case.
    pub fn new(app: Router) -> Self {
        Self {
            app,
            request: Request::builder()
                .method(Method::GET)
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        }
    }

    /// Set the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        *self.request.method_mut() = method;
        self
    }

    /// Set the URI/path
    pub fn uri(mut self, uri: &str) -> Self {
        *self.request.uri_mut() = uri.parse().unwrap();
        self
    }

    /// Add a header
    pub fn header(mut self, key: &str, value: &str) -> Self {
        use axum::http::HeaderName;
        self.request.headers_mut().insert(
            HeaderName::from_bytes(key.as_bytes()).unwrap(),
            value.parse().unwrap(),
        );
        self
    }

    /// Set plain text body
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        *self.request.body_mut() = Body::from(body.into());
        self
    }

    /// Pretend the connection came from this socket address.
    pub fn peer_addr(mut self, addr: SocketAddr) -> Self {
        self.request.extensions_mut().insert(ConnectInfo(addr));
        self
    }

    /// Pretend the connection came from this IP; the port does not
    /// matter to any guard. Accepts IPv6 literals too, for tests that
    /// cover the not-IPv4 rejection.
    pub fn peer_ip(self, ip: &str) -> Self {
        let ip: IpAddr = ip.parse().expect("test peer IP should parse");
        self.peer_addr(SocketAddr::new(ip, 0))
    }

    /// Execute the request and get an assertion builder
    pub async fn execute(self) -> ScenarioAssert {
        let response = self.app.oneshot(self.request).await.unwrap();
        ScenarioAssert { response }
    }
}

/// Assertion builder for test responses
pub struct ScenarioAssert {
    response: axum::response::Response,
}

impl ScenarioAssert {
    /// Assert the response status code
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.response.status(),
            expected,
            "Expected status {}, got {}",
            expected,
            self.response.status()
        );
        self
    }

    /// Assert status is 200 OK
    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    /// Assert status is 403 Forbidden
    pub fn assert_forbidden(self) -> Self {
        self.assert_status(StatusCode::FORBIDDEN)
    }

    /// Assert status is 500 Internal Server Error
    pub fn assert_server_error(self) -> Self {
        self.assert_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the response body as bytes
    pub async fn body_bytes(self) -> Vec<u8> {
        axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    /// Get the response body as a string
    pub async fn body_string(self) -> String {
        String::from_utf8(self.body_bytes().await).unwrap()
    }

    /// Get the underlying response for custom assertions
    pub fn response(self) -> axum::response::Response {
        self.response
    }
}

/// Convenience function to create a GET request scenario
pub fn get(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::GET).uri(uri)
}

/// Convenience function to create a POST request scenario
pub fn post(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::POST).uri(uri)
}
