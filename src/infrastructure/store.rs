//! The in-memory task store.
//!
//! `TaskStore` owns the ordered task sequence and is the source of truth for
//! every read. Each mutation takes the write lock, changes the sequence,
//! hands the whole sequence to the storage backend and, if that fails,
//! restores exactly what was there before releasing the lock. Readers
//! therefore never observe a change that did not reach storage.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::repository::{IdStrategy, StorageError, StoreError, TaskStorage};
use crate::domain::{NewTask, Task, TaskFilter, TaskId, TaskPatch, TaskStats};

/// Shared, lock-guarded task store mirrored to a [`TaskStorage`].
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
    storage: Arc<dyn TaskStorage>,
    id_strategy: IdStrategy,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskStore")
            .field("id_strategy", &self.id_strategy)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl TaskStore {
    /// Loads the initial contents from `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the backing data cannot be read.
    pub fn open(
        storage: Arc<dyn TaskStorage>,
        id_strategy: IdStrategy,
    ) -> Result<Self, StorageError> {
        let tasks = storage.load()?;
        Ok(Self::with_tasks(storage, id_strategy, tasks))
    }

    /// Creates a store with the given contents, without reading `storage`.
    #[must_use]
    pub fn with_tasks(
        storage: Arc<dyn TaskStorage>,
        id_strategy: IdStrategy,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            storage,
            id_strategy,
        }
    }

    /// Returns a copy of every task, in store order.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Number of tasks in the store.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Returns true if the store holds no tasks.
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Tasks matching `filter`, in store order.
    pub async fn list(&self, filter: &TaskFilter) -> Vec<Task> {
        filter.apply(&self.tasks.read().await)
    }

    /// Completed tasks, in store order.
    pub async fn completed(&self) -> Vec<Task> {
        self.list(&TaskFilter::completed_only()).await
    }

    /// Aggregate statistics over the whole store.
    pub async fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks.read().await)
    }

    /// First task carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has that id.
    pub async fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        self.tasks
            .read()
            .await
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Appends a new task and persists the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PersistFailed`] if the store could not be saved;
    /// the task is not kept in that case.
    pub async fn create(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = Task::create(self.id_strategy.next_id(&tasks), new_task);
        tasks.push(task.clone());

        if let Err(error) = self.persist(&tasks).await {
            tasks.pop();
            tracing::warn!(task_id = %task.id, "Rolled back task creation");
            return Err(error);
        }

        tracing::debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Merges `patch` into the first task carrying `id` and persists the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has that id, or
    /// [`StoreError::PersistFailed`] if the store could not be saved; the
    /// task keeps its previous value in that case.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let updated = tasks[index].apply_patch(patch);
        let previous = std::mem::replace(&mut tasks[index], updated.clone());

        if let Err(error) = self.persist(&tasks).await {
            tasks[index] = previous;
            tracing::warn!(task_id = %id, "Rolled back task update");
            return Err(error);
        }

        tracing::debug!(task_id = %id, "Task updated");
        Ok(updated)
    }

    /// Removes every task carrying `id` and persists the store.
    ///
    /// Returns the number of removed tasks. Ids are unique unless the count
    /// based [`IdStrategy`] reissued one, so this is normally 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has that id, or
    /// [`StoreError::PersistFailed`] if the store could not be saved; the
    /// removed tasks are put back at their original positions in that case.
    pub async fn delete(&self, id: TaskId) -> Result<usize, StoreError> {
        let mut tasks = self.tasks.write().await;
        let original = tasks.clone();

        tasks.retain(|task| task.id != id);
        let removed = original.len() - tasks.len();
        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }

        if let Err(error) = self.persist(&tasks).await {
            *tasks = original;
            tracing::warn!(task_id = %id, "Rolled back task deletion");
            return Err(error);
        }

        tracing::debug!(task_id = %id, removed, "Task deleted");
        Ok(removed)
    }

    /// Removes every task and persists the empty store.
    ///
    /// Returns the number of removed tasks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PersistFailed`] if the store could not be saved;
    /// the previous contents are restored in that case.
    pub async fn delete_all(&self) -> Result<usize, StoreError> {
        let mut tasks = self.tasks.write().await;
        let original = std::mem::take(&mut *tasks);

        if let Err(error) = self.persist(&tasks).await {
            *tasks = original;
            tracing::warn!(restored = tasks.len(), "Rolled back purge of all tasks");
            return Err(error);
        }

        tracing::info!(removed = original.len(), "All tasks purged");
        Ok(original.len())
    }

    /// Runs the save on the blocking pool; the caller keeps holding the
    /// write lock until it returns.
    async fn persist(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let storage = Arc::clone(&self.storage);
        let records = tasks.to_vec();

        tokio::task::spawn_blocking(move || storage.save(&records))
            .await
            .unwrap_or_else(|error| Err(StorageError::Interrupted(error.to_string())))
            .map_err(StoreError::PersistFailed)
    }
}

// =============================================================================
// Tests
// =============================================================================
