//! Common test helpers for integration tests.
//!
//! Each test gets its own temporary backing file, a fail-injecting storage
//! around it and the fully layered application router.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every
//! helper.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use task_tracker_api::api::{AppState, application};
use task_tracker_api::domain::Task;
use task_tracker_api::infrastructure::{
    FailInjectingStorage, IdStrategy, JsonLinesStorage, TaskStorage, TaskStore, jsonl,
};

// =============================================================================
// Test Service
// =============================================================================

/// A running application over a temporary backing file.
pub struct TestService {
    directory: TempDir,
    pub storage: Arc<FailInjectingStorage<JsonLinesStorage>>,
    pub state: AppState,
}

impl TestService {
    /// Starts a service over an empty backing file.
    pub fn empty() -> Self {
        Self::with_tasks(&[])
    }

    /// Starts a service whose backing file holds `tasks`.
    pub fn with_tasks(tasks: &[Task]) -> Self {
        let directory = TempDir::new().expect("Failed to create temp dir");
        let path = directory.path().join("tasks.txt");
        jsonl::save(&path, tasks).expect("Failed to seed tasks file");

        let storage = Arc::new(FailInjectingStorage::new(JsonLinesStorage::new(&path)));
        let store =
            TaskStore::open(storage.clone(), IdStrategy::Count).expect("Failed to open store");

        Self {
            directory,
            storage,
            state: AppState::new(store),
        }
    }

    /// Path of the backing file.
    pub fn tasks_file(&self) -> PathBuf {
        self.directory.path().join("tasks.txt")
    }

    /// Raw backing file contents.
    pub fn file_contents(&self) -> String {
        std::fs::read_to_string(self.tasks_file()).expect("Failed to read tasks file")
    }

    /// Tasks currently on disk.
    pub fn on_disk(&self) -> Vec<Task> {
        self.storage.load().expect("Failed to load tasks file")
    }

    /// The application router.
    pub fn router(&self) -> Router {
        application(self.state.clone())
    }

    /// Sends a request with an optional JSON body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            body: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }
}

// =============================================================================
// Test Response
// =============================================================================

/// Status and collected body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|error| {
            panic!(
                "Body is not the expected JSON ({error}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }
}
