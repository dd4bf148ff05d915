//! Repository port for task persistence.

use crate::task::domain::{NewTask, Task, TaskId, TaskListItem, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it with its assigned identifier.
    ///
    /// The stored task uses the next free identifier, records the creator as
    /// both creator and modifier, starts at version zero, and has no
    /// resolution, assignee, closer or tags.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::UnknownUser`] when the creator is not a
    /// registered user.
    async fn create(&self, new_task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier, including its tags.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists all tasks ordered by identifier.
    async fn find_all(&self) -> TaskRepositoryResult<Vec<TaskListItem>>;

    /// Persists changes to an existing task and returns the stored result.
    ///
    /// The write succeeds only if the stored version equals
    /// [`Task::version`]; the returned task carries the incremented version.
    /// Creator, creation time and tags are never written by this method.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist,
    /// [`TaskRepositoryError::ConcurrentModification`] on a version mismatch,
    /// and [`TaskRepositoryError::UnknownUser`] when a referenced user does
    /// not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task>;

    /// Deletes a task together with its tag associations.
    ///
    /// Returns the task as it was before deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A referenced user does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// The task was changed by someone else since it was read.
    #[error("task {id} was modified concurrently, expected version {expected}")]
    ConcurrentModification {
        /// Task being updated.
        id: TaskId,
        /// Version the caller read.
        expected: i64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
