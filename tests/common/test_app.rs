//! Test application setup utilities
//!
//! Provides utilities for setting up test instances of the application
//! over mock data sources or the catalog alone.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use tower::ServiceExt;

use arc_benefits::{
    config::AppConfig,
    create_router,
    services::{BenefitCatalog, BenefitService, DataSources, RateTable},
    AppState,
};

use super::mocks::MockInventory;

/// Test application wrapper for integration testing
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with no live source (catalog only)
    pub fn new() -> Self {
        Self::with_service(BenefitService::new(
            None,
            RateTable::default(),
            BenefitCatalog::bundled().expect("bundled catalog parses"),
        ))
    }

    /// Create a test application backed by a mock inventory
    pub fn with_inventory(inventory: Arc<MockInventory>) -> Self {
        Self::with_service(BenefitService::new(
            Some(inventory.data_sources()),
            RateTable::default(),
            BenefitCatalog::bundled().expect("bundled catalog parses"),
        ))
    }

    /// Create a test application with explicit collaborators
    pub fn with_parts(
        sources: Option<DataSources>,
        rates: RateTable,
        catalog: BenefitCatalog,
    ) -> Self {
        Self::with_service(BenefitService::new(sources, rates, catalog))
    }

    /// Create a test application around a prepared service
    pub fn with_service(service: BenefitService) -> Self {
        let state = AppState {
            config: test_config(),
            benefits: Arc::new(service),
        };
        let router = create_router(state.clone());

        Self { router, state }
    }

    /// Make a GET request to the test application
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Make an arbitrary request
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: bytes::Bytes,
}

impl TestResponse {
    /// Get the response body as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse response as JSON")
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Check if the response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Assert the response status
    pub fn assert_status(&self, expected: axum::http::StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Assert the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::OK)
    }

    /// Assert the response status is Bad Request (400)
    pub fn assert_bad_request(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::BAD_REQUEST)
    }

    /// Assert the response status is Not Found (404)
    pub fn assert_not_found(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::NOT_FOUND)
    }
}

/// Configuration used by test applications
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.cache.enabled = false;
    config
}
