//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not positive.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The user identifier is not positive.
    #[error("invalid user identifier {0}, expected a positive integer")]
    InvalidUserId(i64),

    /// The tag identifier is not positive.
    #[error("invalid tag identifier {0}, expected a positive integer")]
    InvalidTagId(i64),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("task title has {actual} characters, at most {max} are allowed")]
    TitleTooLong {
        /// Maximum number of characters.
        max: usize,
        /// Number of characters supplied.
        actual: usize,
    },

    /// The task description exceeds the persisted column width.
    #[error("task description has {actual} characters, at most {max} are allowed")]
    DescriptionTooLong {
        /// Maximum number of characters.
        max: usize,
        /// Number of characters supplied.
        actual: usize,
    },

    /// A new task was requested in the closed status.
    #[error("a task cannot be created as closed")]
    ClosedOnCreate,

    /// The requested status change is not allowed.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The task is closed and can no longer be edited.
    #[error("task {0} is closed")]
    TaskClosed(TaskId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task resolutions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task resolution: {0}")]
pub struct ParseTaskResolutionError(pub String);
