//! Fail injection for task storage.
//!
//! [`FailInjectingStorage`] wraps any [`TaskStorage`] and can be switched at
//! runtime to reject saves. Loads are always delegated. This is how the
//! rollback paths of the task store are exercised without touching file
//! permissions.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::repository::{StorageError, TaskStorage};
use crate::domain::Task;

/// Storage wrapper whose saves can be made to fail on demand.
#[derive(Debug)]
pub struct FailInjectingStorage<S> {
    inner: S,
    fail_saves: AtomicBool,
    save_attempts: AtomicUsize,
}

impl<S: TaskStorage> FailInjectingStorage<S> {
    /// Wraps `inner`; saves succeed until [`Self::set_fail_saves`] is called.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            fail_saves: AtomicBool::new(false),
            save_attempts: AtomicUsize::new(0),
        }
    }

    /// Turns save failures on or off.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of saves attempted so far, failed ones included.
    #[must_use]
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

impl<S: TaskStorage> TaskStorage for FailInjectingStorage<S> {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        self.inner.load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::InjectedFailure(
                "save rejected by fail injection".to_string(),
            ));
        }

        self.inner.save(tasks)
    }
}

// =============================================================================
// Tests
// =============================================================================
