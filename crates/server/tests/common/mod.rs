//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with a mock ffmpeg invoker injected, so the HTTP surface can be exercised
//! without a real ffmpeg binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use transcoder_core::{
    testing::{MockInvoker, StaticToolProbe},
    Config, StorageConfig,
};
use transcoder_server::state::AppState;

const BOUNDARY: &str = "----transcoder-test-boundary";

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_submit() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .submit(Some(("movie.mkv", b"data")), Some("compress"))
///         .await;
///
///     assert_eq!(response.status, 202);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock invoker - control step outcomes
    pub invoker: MockInvoker,
    /// Mock availability probe
    pub probe: Arc<StaticToolProbe>,
    /// Temporary directory holding uploads and outputs
    pub temp_dir: TempDir,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestFixture {
    /// Create a new test fixture whose invoker writes placeholder outputs.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a test fixture from a base configuration.
    ///
    /// Storage directories are always redirected into a temp dir.
    pub async fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let upload_dir = temp_dir.path().join("uploads");
        let output_dir = temp_dir.path().join("output");
        config.storage = StorageConfig {
            upload_dir: upload_dir.clone(),
            output_dir: output_dir.clone(),
        };

        let invoker = MockInvoker::new();
        invoker.set_materialize_outputs(true).await;
        let probe = Arc::new(StaticToolProbe::available());

        let state = Arc::new(AppState::new(
            config,
            Arc::new(invoker.clone()),
            probe.clone(),
        ));

        // Create router
        let router = transcoder_server::api::create_router(state);

        Self {
            router,
            invoker,
            probe,
            temp_dir,
            upload_dir,
            output_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart job submission.
    ///
    /// `file` is `(filename, contents)`; either part can be left out.
    pub async fn submit(&self, file: Option<(&str, &[u8])>, operation: Option<&str>) -> TestResponse {
        let body = multipart_body(file, operation);
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Submit and return the task id, asserting acceptance.
    pub async fn submit_ok(&self, filename: &str, operation: &str) -> String {
        let response = self
            .submit(Some((filename, b"media bytes")), Some(operation))
            .await;
        assert_eq!(response.status, StatusCode::ACCEPTED, "{:?}", response.body);
        response.body["task_id"]
            .as_str()
            .expect("task_id should be a string")
            .to_string()
    }

    /// Poll the status endpoint until the task is completed or errored.
    pub async fn wait_for_terminal(&self, task_id: &str) -> Value {
        for _ in 0..500 {
            let response = self.get(&format!("/api/v1/jobs/{task_id}")).await;
            assert_eq!(response.status, StatusCode::OK);
            let status = response.body["status"].as_str().unwrap_or_default();
            if status == "completed" || status == "error" {
                return response.body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task {task_id} did not finish in time");
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

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            raw: body_bytes.to_vec(),
        }
    }
}

/// Builds a multipart/form-data body by hand.
fn multipart_body(file: Option<(&str, &[u8])>, operation: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some((filename, contents)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(operation) = operation {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"operation\"\r\n\r\n");
        body.extend_from_slice(operation.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
