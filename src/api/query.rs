//! Query handlers for task retrieval and statistics.
//!
//! # Endpoints
//!
//! - `GET /tasks/` - List tasks, optionally filtered by title and completion
//! - `GET /tasks/completed` - List completed tasks
//! - `GET /tasks/stats` - Aggregate counters
//! - `GET /tasks/{id}` - Fetch a single task

use axum::{
    Json,
    extract::{Path, Query, State},
};

use super::dto::{ListTasksQuery, TaskResponse};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::{Task, TaskFilter, TaskId, TaskStats};

fn to_responses(tasks: Vec<Task>) -> Vec<TaskResponse> {
    tasks.into_iter().map(TaskResponse::from).collect()
}

/// Lists tasks in store order.
///
/// # Query Parameters
///
/// - `title`: case-insensitive substring of the title
/// - `completed`: `true` or `false`
///
/// Both filters combine; with neither, every task is returned.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Json<Vec<TaskResponse>> {
    let filter = TaskFilter::from(query);
    Json(to_responses(state.store.list(&filter).await))
}

/// Lists completed tasks in store order.
pub async fn list_completed_tasks(State(state): State<AppState>) -> Json<Vec<TaskResponse>> {
    Json(to_responses(state.store.completed().await))
}

/// Returns aggregate counters over the whole store.
///
/// ```json
/// {
///   "total": 4,
///   "completed": 1,
///   "open_tasks": 3,
///   "percent_completed": 0.04
/// }
/// ```
///
/// `percent_completed` uses the legacy formula, see
/// [`percent_completed`](crate::domain::percent_completed).
pub async fn task_stats(State(state): State<AppState>) -> Json<TaskStats> {
    Json(state.store.stats().await)
}

/// Fetches a single task by id.
///
/// # Errors
///
/// Returns 404 if no task has the id.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let task = state.store.get(TaskId::new(id)).await?;
    Ok(Json(TaskResponse::from(task)))
}
