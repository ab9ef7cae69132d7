//! Storage seam and error types for the task store.
//!
//! `TaskStorage` is the boundary between the in-memory store and whatever
//! mirrors it. Every mutation hands the complete record sequence to
//! [`TaskStorage::save`]; there are no incremental writes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Task, TaskId};

// =============================================================================
// Errors
// =============================================================================

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file is missing or could not be read.
    #[error("Storage unavailable at {}: {source}", .path.display())]
    Unavailable {
        /// Location of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing the backing file failed. The file may be left truncated.
    #[error("Could not write to {}: {source}", .path.display())]
    Write {
        /// Location of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A record could not be serialized.
    #[error("Could not encode task record: {0}")]
    Encode(#[from] serde_json::Error),

    /// The blocking write task panicked or was cancelled.
    #[error("Storage write did not complete: {0}")]
    Interrupted(String),

    /// Failure produced by [`FailInjectingStorage`](super::FailInjectingStorage).
    #[error("Injected failure: {0}")]
    InjectedFailure(String),
}

/// Errors raised by [`TaskStore`](super::TaskStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No task carries the requested id.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// The mutation could not be persisted and was rolled back in memory.
    #[error("Failed to persist tasks: {0}")]
    PersistFailed(#[source] StorageError),
}

// =============================================================================
// Storage Trait
// =============================================================================

/// Backend that mirrors the task store.
pub trait TaskStorage: Send + Sync {
    /// Reads every record, in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the backing data cannot be read.
    fn load(&self) -> Result<Vec<Task>, StorageError>;

    /// Replaces the stored records with `tasks`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the records could not be written.
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

// =============================================================================
// Id Assignment
// =============================================================================

/// How new task ids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// `count + 1`. Can hand out an id that is still in use once tasks have
    /// been deleted.
    #[default]
    Count,
    /// `highest id + 1`. Never collides with a live record.
    NextAfterMax,
}

impl IdStrategy {
    /// Picks the id for the next task given the current store contents.
    #[must_use]
    pub fn next_id(self, tasks: &[Task]) -> TaskId {
        match self {
            Self::Count => super::jsonl::next_id(tasks),
            Self::NextAfterMax => super::jsonl::next_id_after_max(tasks),
        }
    }
}

/// How the backing file is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate and write the file in place.
    #[default]
    Overwrite,
    /// Write a sibling temporary file and rename it over the target.
    Atomic,
}

// =============================================================================
// Tests
// =============================================================================
