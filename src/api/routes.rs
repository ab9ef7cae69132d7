//! Router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, create_task, health_check};
use super::mutation::{delete_all_tasks, delete_task, update_task};
use super::query::{get_task, list_completed_tasks, list_tasks, task_stats};

/// Task routes, without state or middleware.
///
/// The collection is reachable both as `/tasks` and `/tasks/`.
pub fn routes() -> Router<AppState> {
    let collection = get(list_tasks).post(create_task).delete(delete_all_tasks);

    Router::new()
        .route("/", get(health_check))
        .route("/tasks", collection.clone())
        .route("/tasks/", collection)
        .route("/tasks/completed", get(list_completed_tasks))
        .route("/tasks/stats", get(task_stats))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
}

/// The complete application: routes, request tracing, CORS and state.
pub fn application(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
