//! Data Transfer Objects for API requests and responses.
//!
//! This module contains DTOs that are separate from domain models,
//! providing a clean API contract.

use serde::{Deserialize, Deserializer, Serialize};

use super::error::ValidationError;
use crate::domain::{NewTask, Task, TaskFilter, TaskPatch};

// =============================================================================
// Task DTOs
// =============================================================================

/// Request DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    /// Title of the task.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request DTO for a partial task update.
///
/// Absent fields are left untouched. `"description": null` clears the
/// description; `null` for `title` or `completed` is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title for the task.
    #[serde(default)]
    pub title: Option<String>,
    /// New description; `Some(None)` when the client sent `null`.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
    /// New completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Marks a field as present even when its value is `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Response DTO for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: i64,
    /// Title of the task.
    pub title: String,
    /// Description of the task.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.value(),
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.value(),
            title: task.title,
            description: task.description,
            completed: task.completed,
        }
    }
}

/// Query parameters for listing tasks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Filter by completion status.
    pub completed: Option<bool>,
}

impl From<ListTasksQuery> for TaskFilter {
    fn from(query: ListTasksQuery) -> Self {
        Self {
            title: query.title,
            completed: query.completed,
        }
    }
}

/// Confirmation body for delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Creates a new message response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a task title.
///
/// # Validation Rules
///
/// - Title must contain at least one non-whitespace character
///
/// # Errors
///
/// Returns a [`ValidationError`] for the `title` field if the rule is broken.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::single("title", "Title is required"));
    }
    Ok(())
}

impl CreateTaskRequest {
    /// Validates the request and converts it into domain input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is blank.
    pub fn into_new_task(self) -> Result<NewTask, ValidationError> {
        validate_title(&self.title)?;
        Ok(NewTask {
            title: self.title,
            description: self.description,
        })
    }
}

impl UpdateTaskRequest {
    /// Validates the request and converts it into a domain patch.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a title is supplied and blank.
    pub fn into_patch(self) -> Result<TaskPatch, ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        Ok(TaskPatch {
            title: self.title,
            description: self.description,
            completed: self.completed,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
