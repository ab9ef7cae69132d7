//! Line-delimited JSON persistence.
//!
//! The backing file holds one JSON object per line, no enclosing array.
//! Loading is lenient: blank lines are ignored and lines that do not decode
//! into a [`Task`] are skipped with a warning instead of failing the load.
//! Saving always rewrites the whole file.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::repository::{StorageError, TaskStorage, WriteMode};
use crate::domain::{Task, TaskId};

// =============================================================================
// Helpers
// =============================================================================

/// Reads every decodable task from `path`, in file order.
///
/// # Errors
///
/// Returns [`StorageError::Unavailable`] if the file does not exist or an
/// I/O error occurs while reading it.
pub fn load(path: &Path) -> Result<Vec<Task>, StorageError> {
    let unavailable = |source| StorageError::Unavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unavailable)?;
    let mut tasks = Vec::new();
    let mut skipped = 0_usize;

    for (index, line) in BufReader::new(file).split(b'\n').enumerate() {
        let line = line.map_err(unavailable)?;
        let line_number = index + 1;
        let record = line.trim_ascii();

        if record.is_empty() {
            continue;
        }

        match serde_json::from_slice::<Task>(record) {
            Ok(task) => tasks.push(task),
            Err(error) => {
                skipped += 1;
                tracing::warn!(
                    path = %path.display(),
                    line_number,
                    %error,
                    "Skipping undecodable task record"
                );
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        loaded = tasks.len(),
        skipped,
        "Loaded tasks from disk"
    );

    Ok(tasks)
}

/// Overwrites `path` with `tasks`, one JSON object per line.
///
/// The file is truncated before writing, so a failure part-way through can
/// leave it incomplete.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] if a record cannot be serialized, or
/// [`StorageError::Write`] if the file cannot be written.
pub fn save(path: &Path, tasks: &[Task]) -> Result<(), StorageError> {
    let contents = encode(tasks)?;
    fs::write(path, contents).map_err(|source| write_error(path, source))
}

/// Writes `tasks` to a temporary sibling of `path`, then renames it into place.
///
/// # Errors
///
/// Same as [`save`]. On failure the original file is left untouched.
pub fn save_atomic(path: &Path, tasks: &[Task]) -> Result<(), StorageError> {
    let contents = encode(tasks)?;
    let temporary = temporary_path(path);

    fs::write(&temporary, contents).map_err(|source| write_error(path, source))?;

    fs::rename(&temporary, path).map_err(|source| {
        // Best effort; the rename error is the one worth reporting.
        let _ = fs::remove_file(&temporary);
        write_error(path, source)
    })
}

/// Serializes tasks into the on-disk line format.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] if a record cannot be serialized.
pub fn encode(tasks: &[Task]) -> Result<String, StorageError> {
    let mut contents = String::new();
    for task in tasks {
        contents.push_str(&serde_json::to_string(task)?);
        contents.push('\n');
    }
    Ok(contents)
}

/// Id for the next task: number of tasks plus one.
///
/// This does not look at existing ids, so after a deletion it can return an
/// id that is still taken. See [`next_id_after_max`] for the alternative.
#[must_use]
pub fn next_id(tasks: &[Task]) -> TaskId {
    let count = i64::try_from(tasks.len()).unwrap_or(i64::MAX);
    TaskId::new(count.saturating_add(1))
}

/// Id for the next task: highest existing id plus one, never below 1.
#[must_use]
pub fn next_id_after_max(tasks: &[Task]) -> TaskId {
    let highest = tasks
        .iter()
        .map(|task| task.id.value())
        .max()
        .unwrap_or(0)
        .max(0);
    TaskId::new(highest.saturating_add(1))
}

fn write_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "tasks".into(), |name| name.to_string_lossy());
    path.with_file_name(format!(".{name}.tmp"))
}

// =============================================================================
// JSON Lines Storage
// =============================================================================

/// [`TaskStorage`] backed by a line-delimited JSON file.
#[derive(Debug, Clone)]
pub struct JsonLinesStorage {
    path: PathBuf,
    write_mode: WriteMode,
}

impl JsonLinesStorage {
    /// Creates a storage that overwrites `path` in place.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_mode: WriteMode::default(),
        }
    }

    /// Sets how the file is rewritten.
    #[must_use]
    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStorage for JsonLinesStorage {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        load(&self.path)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let result = match self.write_mode {
            WriteMode::Overwrite => save(&self.path, tasks),
            WriteMode::Atomic => save_atomic(&self.path, tasks),
        };

        if let Err(error) = &result {
            tracing::error!(path = %self.path.display(), %error, "Failed to save tasks");
        }

        result
    }
}

// =============================================================================
// Tests
// =============================================================================
