//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock completion endpoint and real temp folders, enabling E2E
//! testing without network access.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use autoshelf_core::{
    load_config_from_str,
    testing::MockLlmClient,
    FsPlacer, Organizer,
};
use autoshelf_server::state::AppState;

/// Re-export fixtures for test convenience
pub use autoshelf_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_import() {
///     let fixture = TestFixture::new().await;
///     let file = fixture.create_download("Oppenheimer.2023.mkv");
///
///     let response = fixture.post("/api/v1/import", json!({ "files": [file], "wait": true })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
#[allow(dead_code)]
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state behind the router
    pub state: Arc<AppState>,
    /// Mock completion endpoint - configure classifier replies
    pub llm: Arc<MockLlmClient>,
    /// Watched download folder
    pub downloads: TempDir,
    /// Library root
    pub library: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Set `library.source_dir` to the download folder
    pub with_source_dir: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_source_dir: true,
        }
    }
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let downloads = TempDir::new().expect("Failed to create download dir");
        let library = TempDir::new().expect("Failed to create library dir");

        let source_line = if test_config.with_source_dir {
            format!("source_dir = '{}'", downloads.path().display())
        } else {
            String::new()
        };
        let config = load_config_from_str(&format!(
            r#"
[server]
port = 8480

[library]
{source_line}
target_dir = '{}'

[classifier]
provider = "deep_seek"
api_key = "sk-test-secret"

[catalog]
api_key = "tmdb-test-secret"

[watch]
enabled = false
settle_secs = 0
"#,
            library.path().display()
        ))
        .expect("Failed to parse test config");

        let llm = Arc::new(MockLlmClient::new());
        let organizer: Arc<Organizer> = Arc::new(fixtures::organizer(
            library.path(),
            Arc::clone(&llm),
            None,
            Arc::new(FsPlacer::new()),
            config.library.mode,
        ));

        let state = Arc::new(AppState::new(config, organizer));
        let router = autoshelf_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            llm,
            downloads,
            library,
        }
    }

    /// Write a file into the download folder and return its path.
    pub fn create_download(&self, name: &str) -> PathBuf {
        let path = self.downloads.path().join(name);
        std::fs::write(&path, format!("contents of {name}")).expect("Failed to write download");
        path
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a GET request and return the raw text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
