//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod mutation;
pub mod query;
pub mod routes;

pub use dto::{CreateTaskRequest, ListTasksQuery, MessageResponse, TaskResponse, UpdateTaskRequest};
pub use error::{ApiError, ApiErrorResponse, FieldError, ValidationError};
pub use handlers::{AppState, HealthResponse, create_task, health_check};
pub use mutation::{delete_all_tasks, delete_task, update_task};
pub use query::{get_task, list_completed_tasks, list_tasks, task_stats};
pub use routes::{application, routes};
