//! Service layer for task creation, lookup and workflow changes.

use crate::task::{
    domain::{
        NewTask, Task, TaskDescription, TaskDomainError, TaskId, TaskListItem, TaskResolution,
        TaskStatus, TaskTitle, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    creator_id: i64,
    title: String,
    description: Option<String>,
    status: TaskStatus,
}

impl CreateTaskRequest {
    /// Creates an open-task request with the required fields.
    #[must_use]
    pub fn new(creator_id: i64, title: impl Into<String>) -> Self {
        Self {
            creator_id,
            title: title.into(),
            description: None,
            status: TaskStatus::Open,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Request payload for replacing the title and description of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    task_id: TaskId,
    modifier_id: i64,
    title: String,
    description: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates an update request; the description is cleared unless set.
    #[must_use]
    pub fn new(task_id: TaskId, modifier_id: i64, title: impl Into<String>) -> Self {
        Self {
            task_id,
            modifier_id,
            title: title.into(),
            description: None,
        }
    }

    /// Sets the new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for closing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTaskRequest {
    task_id: TaskId,
    closer_id: i64,
    resolution: TaskResolution,
}

impl CloseTaskRequest {
    /// Creates a close request.
    #[must_use]
    pub const fn new(task_id: TaskId, closer_id: i64, resolution: TaskResolution) -> Self {
        Self {
            task_id,
            closer_id,
            resolution,
        }
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates and persists a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when input validation fails and
    /// [`TaskServiceError::Repository`] when persistence rejects the task.
    #[instrument(skip_all, fields(creator_id = request.creator_id))]
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let creator = UserId::new(request.creator_id)?;
        let title = TaskTitle::new(request.title)?;
        let description = parse_description(request.description)?;
        let new_task = NewTask::new(creator, title, description, request.status, &*self.clock)?;

        let task = self.repository.create(&new_task).await?;
        info!(task_id = %task.id(), status = %task.status(), "created task");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: TaskId) -> TaskServiceResult<Task> {
        let found = self.repository.find_by_id(id).await?;
        found.ok_or(TaskServiceError::Repository(TaskRepositoryError::NotFound(
            id,
        )))
    }

    /// Lists all tasks ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> TaskServiceResult<Vec<TaskListItem>> {
        let items = self.repository.find_all().await?;
        debug!(count = items.len(), "listed tasks");
        Ok(items)
    }

    /// Replaces the title and description of an editable task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when validation fails, the task is closed
    /// or missing, or the repository rejects the write.
    #[instrument(skip_all, fields(task_id = %request.task_id))]
    pub async fn update(&self, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        let modifier = UserId::new(request.modifier_id)?;
        let title = TaskTitle::new(request.title)?;
        let description = parse_description(request.description)?;

        self.modify(request.task_id, move |task, clock| {
            task.update(title, description, modifier, clock)
        })
        .await
    }

    /// Assigns a task to a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when an identifier is invalid, the task is
    /// closed or missing, or the assignee is unknown.
    #[instrument(skip(self))]
    pub async fn assign(
        &self,
        task_id: TaskId,
        assignee_id: i64,
        modifier_id: i64,
    ) -> TaskServiceResult<Task> {
        let assignee = UserId::new(assignee_id)?;
        let modifier = UserId::new(modifier_id)?;
        self.modify(task_id, move |task, clock| {
            task.assign(assignee, modifier, clock)
        })
        .await
    }

    /// Removes the assignee of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is closed or missing.
    #[instrument(skip(self))]
    pub async fn unassign(&self, task_id: TaskId, modifier_id: i64) -> TaskServiceResult<Task> {
        let modifier = UserId::new(modifier_id)?;
        self.modify(task_id, move |task, clock| task.unassign(modifier, clock))
            .await
    }

    /// Starts work on an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is not open or missing.
    #[instrument(skip(self))]
    pub async fn start(&self, task_id: TaskId, modifier_id: i64) -> TaskServiceResult<Task> {
        let modifier = UserId::new(modifier_id)?;
        self.modify(task_id, move |task, clock| task.start(modifier, clock))
            .await
    }

    /// Closes a task with a resolution.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is already closed or
    /// missing.
    #[instrument(skip(self))]
    pub async fn close(&self, request: CloseTaskRequest) -> TaskServiceResult<Task> {
        let closer = UserId::new(request.closer_id)?;
        let resolution = request.resolution;
        self.modify(request.task_id, move |task, clock| {
            task.close(closer, resolution, clock)
        })
        .await
    }

    /// Reopens a closed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is not closed or missing.
    #[instrument(skip(self))]
    pub async fn reopen(&self, task_id: TaskId, modifier_id: i64) -> TaskServiceResult<Task> {
        let modifier = UserId::new(modifier_id)?;
        self.modify(task_id, move |task, clock| task.reopen(modifier, clock))
            .await
    }

    /// Deletes a task and returns it as it was.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        let deleted = self.repository.delete(task_id).await?;
        info!(task_id = %deleted.id(), "deleted task");
        Ok(deleted)
    }

    /// Loads a task, applies a domain change, and persists the result.
    async fn modify<F>(&self, task_id: TaskId, change: F) -> TaskServiceResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError> + Send,
    {
        let mut task = self.find_by_id(task_id).await?;
        change(&mut task, &*self.clock)?;

        let saved = self.repository.update(&task).await?;
        info!(
            task_id = %saved.id(),
            status = %saved.status(),
            version = saved.version(),
            "saved task changes"
        );
        Ok(saved)
    }
}

fn parse_description(
    description: Option<String>,
) -> Result<Option<TaskDescription>, TaskDomainError> {
    Ok(description
        .map(TaskDescription::new)
        .transpose()?
        .flatten())
}
