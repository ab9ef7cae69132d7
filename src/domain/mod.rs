//! Domain module for task tracking.
//!
//! This module contains the task model and the pure rules that operate on it.

pub mod task;

pub use task::{NewTask, Task, TaskFilter, TaskId, TaskPatch, TaskStats, percent_completed};
