//! Mutation handlers for updating and deleting tasks.
//!
//! Every handler here goes through the store, which persists the full task
//! list and undoes the in-memory change when the write fails. A 500 response
//! therefore always means the mutation did not happen.
//!
//! # Endpoints
//!
//! - `PATCH /tasks/{id}` - Merge-patch a task
//! - `DELETE /tasks/{id}` - Delete a task
//! - `DELETE /tasks/` - Delete every task

use axum::{
    Json,
    extract::{Path, State},
};

use super::dto::{MessageResponse, TaskResponse, UpdateTaskRequest};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::TaskId;

/// Applies a partial update to a task.
///
/// # Request Body
///
/// Any subset of:
///
/// ```json
/// {
///   "title": "New title",
///   "description": null,
///   "completed": true
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: Supplied title is blank
/// - **404 Not Found**: No task has the id
/// - **500 Internal Server Error**: The store could not be saved; the task is unchanged
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let patch = request.into_patch()?;
    let task = state.store.update(TaskId::new(id), &patch).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// Deletes a task.
///
/// # Errors
///
/// - **404 Not Found**: No task has the id
/// - **500 Internal Server Error**: The store could not be saved; the task is kept
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    state.store.delete(TaskId::new(id)).await?;
    Ok(Json(MessageResponse::new("Task deleted")))
}

/// Deletes every task.
///
/// # Errors
///
/// - **500 Internal Server Error**: The store could not be saved; nothing was deleted
pub async fn delete_all_tasks(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    state.store.delete_all().await?;
    Ok(Json(MessageResponse::new("All tasks have been purged")))
}
