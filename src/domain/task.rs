//! Task domain model.
//!
//! This module contains the task record together with the pure operations
//! the service performs over it: merge-patch updates, list filtering and
//! statistics.

use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Identifier of a task, assigned by the server at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a `TaskId` from a raw integer.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

// =============================================================================
// Task Entity
// =============================================================================

/// A task record.
///
/// The serialized form of this struct is exactly what is written to the
/// backing file, one record per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Title of the task.
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates a new, not yet completed task.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            completed: false,
        }
    }

    /// Builds a task from client-supplied fields and a freshly assigned id.
    ///
    /// `completed` always starts out `false`.
    #[must_use]
    pub fn create(id: TaskId, new_task: NewTask) -> Self {
        Self {
            id,
            title: new_task.title,
            description: new_task.description,
            completed: false,
        }
    }

    /// Returns a copy with the given description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns a copy with the given completion flag.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Applies a merge-patch and returns the updated task.
    ///
    /// Only fields present in the patch are overwritten; everything else is
    /// carried over unchanged. The id is never touched.
    #[must_use]
    pub fn apply_patch(&self, patch: &TaskPatch) -> Self {
        Self {
            id: self.id,
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            completed: patch.completed.unwrap_or(self.completed),
        }
    }
}

/// Client-supplied fields for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Title of the task.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

/// A partial update.
///
/// `None` at the outer level means "leave the field alone". For
/// `description`, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
}

// =============================================================================
// Filtering
// =============================================================================

/// Criteria for listing tasks. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring the title must contain.
    pub title: Option<String>,
    /// Required completion flag.
    pub completed: Option<bool>,
}

impl TaskFilter {
    /// Filter that only keeps completed tasks.
    #[must_use]
    pub const fn completed_only() -> Self {
        Self {
            title: None,
            completed: Some(true),
        }
    }

    /// Returns true if the task satisfies every criterion that is set.
    ///
    /// An empty title needle is treated as no title filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let title_matches = self
            .title
            .as_deref()
            .filter(|needle| !needle.is_empty())
            .is_none_or(|needle| task.title.to_lowercase().contains(&needle.to_lowercase()));

        let completed_matches = self
            .completed
            .is_none_or(|completed| task.completed == completed);

        title_matches && completed_matches
    }

    /// Applies the filter to a slice of tasks, keeping store order.
    #[must_use]
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Aggregate counters over the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of tasks not yet completed.
    pub open_tasks: usize,
    /// See [`percent_completed`].
    pub percent_completed: f64,
}

impl TaskStats {
    /// Computes statistics for the given tasks.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();

        Self {
            total,
            completed,
            open_tasks: total - completed,
            percent_completed: percent_completed(completed, total),
        }
    }
}

/// Computes the `percent_completed` figure, rounded to two decimals.
///
/// NOTE: this is the legacy formula `completed / 100 * total`, which is not a
/// percentage (4 tasks with 1 completed yields `0.04`, not `25.0`). Clients
/// depend on the current value; changing it needs sign-off from whoever owns
/// the stats contract.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_completed(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to_hundredths(completed as f64 / 100.0 * total as f64)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new(TaskId::new(1), "Write report").with_completed(true),
            Task::new(TaskId::new(2), "Review report"),
            Task::new(TaskId::new(3), "Buy milk").with_description("2 litres"),
            Task::new(TaskId::new(4), "REPORT to manager"),
        ]
    }

    // -------------------------------------------------------------------------
    // Serialization Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_serializes_flat_with_null_description() {
        let task = Task::new(TaskId::new(7), "Title");
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Title",
                "description": null,
                "completed": false
            })
        );
    }

    #[rstest]
    fn test_task_deserializes_with_missing_optional_fields() {
        let task: Task = serde_json::from_str(r#"{"id": 3, "title": "Only title"}"#).unwrap();

        assert_eq!(task.id, TaskId::new(3));
        assert!(task.description.is_none());
        assert!(!task.completed);
    }

    // -------------------------------------------------------------------------
    // Creation Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_create_forces_not_completed() {
        let task = Task::create(
            TaskId::new(5),
            NewTask {
                title: "New".to_string(),
                description: Some("Desc".to_string()),
            },
        );

        assert_eq!(task.id, TaskId::new(5));
        assert_eq!(task.title, "New");
        assert_eq!(task.description.as_deref(), Some("Desc"));
        assert!(!task.completed);
    }

    // -------------------------------------------------------------------------
    // Patch Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_apply_empty_patch_keeps_task() {
        let task = Task::new(TaskId::new(1), "Title").with_description("Desc");
        let patch = TaskPatch::default();

        assert_eq!(task.apply_patch(&patch), task);
    }

    #[rstest]
    fn test_apply_patch_overwrites_only_present_fields() {
        let task = Task::new(TaskId::new(1), "Title").with_description("Desc");
        let patch = TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        };

        let updated = task.apply_patch(&patch);

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.description.as_deref(), Some("Desc"));
        assert!(updated.completed);
    }

    #[rstest]
    #[case(Some(Some("New".to_string())), Some("New"))]
    #[case(Some(None), None)]
    #[case(None, Some("Old"))]
    fn test_apply_patch_description(
        #[case] description: Option<Option<String>>,
        #[case] expected: Option<&str>,
    ) {
        let task = Task::new(TaskId::new(1), "Title").with_description("Old");
        let patch = TaskPatch {
            description,
            ..TaskPatch::default()
        };

        assert_eq!(task.apply_patch(&patch).description.as_deref(), expected);
    }

    // -------------------------------------------------------------------------
    // Filter Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_empty_filter_returns_everything_in_order() {
        let tasks = sample_tasks();
        let result = TaskFilter::default().apply(&tasks);

        assert_eq!(result, tasks);
    }

    #[rstest]
    fn test_title_filter_is_case_insensitive_substring() {
        let filter = TaskFilter {
            title: Some("RePoRt".to_string()),
            completed: None,
        };
        let ids: Vec<i64> = filter
            .apply(&sample_tasks())
            .iter()
            .map(|task| task.id.value())
            .collect();

        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[rstest]
    fn test_empty_title_needle_is_ignored() {
        let filter = TaskFilter {
            title: Some(String::new()),
            completed: None,
        };

        assert_eq!(filter.apply(&sample_tasks()).len(), 4);
    }

    #[rstest]
    fn test_filters_combine_with_and() {
        let filter = TaskFilter {
            title: Some("report".to_string()),
            completed: Some(false),
        };
        let ids: Vec<i64> = filter
            .apply(&sample_tasks())
            .iter()
            .map(|task| task.id.value())
            .collect();

        assert_eq!(ids, vec![2, 4]);
    }

    #[rstest]
    fn test_completed_only() {
        let result = TaskFilter::completed_only().apply(&sample_tasks());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, TaskId::new(1));
    }

    // -------------------------------------------------------------------------
    // Stats Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_stats_for_four_tasks_one_completed() {
        let stats = TaskStats::from_tasks(&sample_tasks());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.open_tasks, 3);
        // Legacy formula: 1 / 100 * 4
        assert!((stats.percent_completed - 0.04).abs() < f64::EPSILON);
    }

    #[rstest]
    fn test_stats_for_empty_store() {
        let stats = TaskStats::from_tasks(&[]);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.open_tasks, 0);
        assert!(stats.percent_completed.abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(0, 10, 0.0)]
    #[case(1, 4, 0.04)]
    #[case(10, 10, 1.0)]
    #[case(3, 7, 0.21)]
    #[case(50, 200, 100.0)]
    fn test_percent_completed_legacy_formula(
        #[case] completed: usize,
        #[case] total: usize,
        #[case] expected: f64,
    ) {
        let actual = percent_completed(completed, total);
        assert!(
            (actual - expected).abs() < 1e-9,
            "completed={completed} total={total} actual={actual} expected={expected}"
        );
    }
}
