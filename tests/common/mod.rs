// Common test utilities and helper structs
// Shared across all test files to avoid duplication

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use phish_scanner::{
    app::AppState, app_config::AppConfig, build_router, BlacklistLookup, BlacklistVerdict,
    ScanOrchestrator,
};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Blacklist stub that always answers with the same verdict and counts calls
pub struct StaticBlacklist {
    verdict: BlacklistVerdict,
    calls: AtomicUsize,
}

impl StaticBlacklist {
    pub fn new(verdict: BlacklistVerdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            calls: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlacklistLookup for StaticBlacklist {
    async fn lookup(&self, _url: &str) -> BlacklistVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict.clone()
    }
}

/// Orchestrator with default lists and the given blacklist stub
#[allow(dead_code)]
pub fn test_scanner(blacklist: Arc<StaticBlacklist>) -> ScanOrchestrator {
    ScanOrchestrator::with_blacklist(&AppConfig::default().scanner, blacklist)
        .expect("bundled suffix list should parse")
}

/// Test application wrapper
#[allow(dead_code)]
pub struct TestApp {
    pub app: Router,
    pub blacklist: Arc<StaticBlacklist>,
}

#[allow(dead_code)]
impl TestApp {
    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "GET", uri)
    }
}

/// Test request builder
#[allow(dead_code)]
pub struct TestRequest<'a> {
    app: &'a TestApp,
    request: Request<Body>,
}

#[allow(dead_code)]
impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &str, uri: &str) -> Self {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        Self { app, request }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(self, body: &T) -> Self {
        let body_bytes = serde_json::to_vec(body).unwrap();
        self.raw_json(body_bytes)
    }

    /// Add an arbitrary body with a JSON content type
    pub fn raw_json(mut self, body: impl Into<Body>) -> Self {
        self.request = Request::builder()
            .method(self.request.method().clone())
            .uri(self.request.uri().clone())
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        self
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let response = self.app.app.clone().oneshot(self.request).await.unwrap();

        TestResponse { response }
    }
}

/// Test response wrapper
#[allow(dead_code)]
pub struct TestResponse {
    response: Response<Body>,
}

#[allow(dead_code)]
impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Get response body as text
    pub async fn text(self) -> String {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}

/// Setup the full router with a stubbed blacklist
#[allow(dead_code)]
pub fn setup_test_app(verdict: BlacklistVerdict) -> TestApp {
    let blacklist = StaticBlacklist::new(verdict);
    let state = AppState::with_blacklist(AppConfig::default(), blacklist.clone(), false)
        .expect("Failed to build app state");

    TestApp {
        app: build_router(state),
        blacklist,
    }
}
