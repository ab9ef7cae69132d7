//! HTTP handlers for service health and task creation, plus the shared
//! application state every handler receives.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::dto::{CreateTaskRequest, TaskResponse};
use super::error::ApiErrorResponse;
use crate::infrastructure::TaskStore;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The store is injected here once at startup instead of living in a global.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The task store every handler reads and mutates.
    pub store: Arc<TaskStore>,
}

impl AppState {
    /// Creates a new `AppState` around an opened store.
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

// =============================================================================
// POST /tasks/ Handler
// =============================================================================

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Task title",
///   "description": "Optional description"
/// }
/// ```
///
/// # Response
///
/// - **200 OK**: The created task, with `completed` set to `false`
/// - **400 Bad Request**: Blank title
/// - **500 Internal Server Error**: The store could not be saved; nothing was created
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] for validation and persistence failures.
pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let new_task = request.into_new_task()?;
    let task = state.store.create(new_task).await?;
    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// GET / Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Human-readable detail.
    pub message: String,
}

/// Health check endpoint.
///
/// ```json
/// {
///   "status": "healthy",
///   "message": "API is running"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "API is running".to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rstest::rstest;
    use tempfile::TempDir;

    use crate::infrastructure::{FailInjectingStorage, IdStrategy, JsonLinesStorage, jsonl};

    fn state_with_storage() -> (TempDir, Arc<FailInjectingStorage<JsonLinesStorage>>, AppState) {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("tasks.txt");
        jsonl::save(&path, &[]).unwrap();
        let storage = Arc::new(FailInjectingStorage::new(JsonLinesStorage::new(&path)));
        let store = TaskStore::open(storage.clone(), IdStrategy::Count).unwrap();
        (directory, storage, AppState::new(store))
    }

    #[rstest]
    #[tokio::test]
    async fn test_health_check() {
        let Json(response) = health_check().await;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.message, "API is running");
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_returns_created_task() {
        let (_directory, _storage, state) = state_with_storage();
        let request = CreateTaskRequest {
            title: "Write tests".to_string(),
            description: Some("for the store".to_string()),
        };

        let Json(response) = create_task(State(state.clone()), Json(request))
            .await
            .unwrap();

        assert_eq!(response.id, 1);
        assert!(!response.completed);
        assert_eq!(state.store.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_blank_title_is_rejected() {
        let (_directory, storage, state) = state_with_storage();
        let request = CreateTaskRequest {
            title: "  ".to_string(),
            description: None,
        };

        let error = create_task(State(state), Json(request)).await.unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(storage.save_attempts(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_persist_failure_is_500() {
        let (_directory, storage, state) = state_with_storage();
        storage.set_fail_saves(true);
        let request = CreateTaskRequest {
            title: "Doomed".to_string(),
            description: None,
        };

        let error = create_task(State(state.clone()), Json(request))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.store.is_empty().await);
    }
}
