//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock video platform injected, so hunts run without network access
//! or API quota.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gemhunter_core::{
    platform::ChannelStatistics, testing::MockPlatform, Config, InMemorySearchCache, SearchCache,
};
use gemhunter_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use gemhunter_core::testing::fixtures;

/// Test fixture for E2E testing with a mock platform.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_hunt() {
///     let fixture = TestFixture::new().await;
///     fixture.add_video("aita", "v1", "c1", 5, 50_000, 2_000).await;
///
///     let response = fixture.post("/api/v1/hunt", json!({"keywords": ["aita"]})).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock platform - configure search hits and statistics
    pub platform: Arc<MockPlatform>,
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default settings.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let platform = Arc::new(MockPlatform::new());

        let mut config = Config::default();
        config.youtube.api_key = "test-key".to_string();
        config.hunt.keyword_delay_ms = 0;
        config.hunt.keywords = vec!["aita".to_string(), "reddit update".to_string()];
        config.cache.enabled = test_config.enable_cache;

        let cache: Option<Arc<dyn SearchCache>> = if test_config.enable_cache {
            Some(Arc::new(InMemorySearchCache::from_config(&config.cache)))
        } else {
            None
        };

        let (state, _forwarder) = AppState::with_event_forwarding(
            config,
            Arc::clone(&platform) as Arc<dyn gemhunter_core::VideoPlatform>,
            cache,
        );
        let state = Arc::new(state);
        let router = create_router(Arc::clone(&state));

        Self {
            router,
            platform,
            state,
        }
    }

    /// Register a video under `keyword` with its statistics and its
    /// channel's subscriber count. Engagement is always 3%.
    pub async fn add_video(
        &self,
        keyword: &str,
        video_id: &str,
        channel_id: &str,
        days_ago: i64,
        views: u64,
        subscribers: u64,
    ) {
        use gemhunter_core::platform::{VideoPlatform, VideoSearchRequest};

        let request = VideoSearchRequest {
            keyword: keyword.to_string(),
            published_after: String::new(),
            page_size: 50,
            region_code: None,
            relevance_language: None,
        };
        let mut hits = self
            .platform
            .search_videos(&request)
            .await
            .unwrap_or_default();
        self.platform.clear_recorded().await;

        hits.push(fixtures::search_hit(video_id, channel_id, days_ago));
        self.platform.set_search_results(keyword, hits).await;
        self.platform
            .set_video_statistics(
                video_id,
                fixtures::video_stats(views, views / 50, views / 100),
            )
            .await;
        self.platform
            .set_channel_statistics(
                channel_id,
                ChannelStatistics {
                    subscriber_count: subscribers,
                },
            )
            .await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub enable_cache: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self { enable_cache: true }
    }
}

impl TestConfig {
    pub fn without_cache() -> Self {
        Self {
            enable_cache: false,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
