//! Task aggregate root and the values used to create and list tasks.

use super::{
    Tag, TaskDescription, TaskDomainError, TaskId, TaskResolution, TaskStatus, TaskTitle, UserId,
};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated request to persist a new task.
///
/// The repository assigns the identifier; the creator also becomes the first
/// modifier and the creation timestamp doubles as the first modification
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    creator: UserId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a new task request stamped with the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ClosedOnCreate`] when `status` is
    /// [`TaskStatus::Closed`]; a closed task needs a closer and a resolution.
    pub fn new(
        creator: UserId,
        title: TaskTitle,
        description: Option<TaskDescription>,
        status: TaskStatus,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if status == TaskStatus::Closed {
            return Err(TaskDomainError::ClosedOnCreate);
        }

        Ok(Self {
            creator,
            title,
            description,
            status,
            created_at: stamp(clock),
        })
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the initial status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    status: TaskStatus,
    resolution: Option<TaskResolution>,
    creator: UserId,
    modifier: UserId,
    assignee: Option<UserId>,
    closer: Option<UserId>,
    tags: Vec<Tag>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    version: i64,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted resolution, set only for closed tasks.
    pub resolution: Option<TaskResolution>,
    /// User who created the task.
    pub creator: UserId,
    /// User who last modified the task.
    pub modifier: UserId,
    /// Assigned user, if any.
    pub assignee: Option<UserId>,
    /// User who closed the task, if closed.
    pub closer: Option<UserId>,
    /// Associated tags.
    pub tags: Vec<Tag>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub modified_at: DateTime<Utc>,
    /// Optimistic locking version.
    pub version: i64,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    ///
    /// Tags are ordered by name.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let PersistedTaskData {
            id,
            title,
            description,
            status,
            resolution,
            creator,
            modifier,
            assignee,
            closer,
            mut tags,
            created_at,
            modified_at,
            version,
        } = data;
        tags.sort_by(|left, right| left.name().cmp(right.name()));

        Self {
            id,
            title,
            description,
            status,
            resolution,
            creator,
            modifier,
            assignee,
            closer,
            tags,
            created_at,
            modified_at,
            version,
        }
    }

    /// Decomposes the task into its persisted representation.
    #[must_use]
    pub fn into_persisted(self) -> PersistedTaskData {
        PersistedTaskData {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            resolution: self.resolution,
            creator: self.creator,
            modifier: self.modifier,
            assignee: self.assignee,
            closer: self.closer,
            tags: self.tags,
            created_at: self.created_at,
            modified_at: self.modified_at,
            version: self.version,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the resolution of a closed task.
    #[must_use]
    pub const fn resolution(&self) -> Option<TaskResolution> {
        self.resolution
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns the user who last modified the task.
    #[must_use]
    pub const fn modifier(&self) -> UserId {
        self.modifier
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the user who closed the task, if closed.
    #[must_use]
    pub const fn closer(&self) -> Option<UserId> {
        self.closer
    }

    /// Returns the associated tags ordered by name.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Returns the optimistic locking version.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Replaces the title and description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskClosed`] if the task is closed.
    pub fn update(
        &mut self,
        title: TaskTitle,
        description: Option<TaskDescription>,
        modifier: UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_editable()?;
        self.title = title;
        self.description = description;
        self.touch(modifier, clock);
        Ok(())
    }

    /// Assigns the task to a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskClosed`] if the task is closed.
    pub fn assign(
        &mut self,
        assignee: UserId,
        modifier: UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_editable()?;
        self.assignee = Some(assignee);
        self.touch(modifier, clock);
        Ok(())
    }

    /// Removes the current assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskClosed`] if the task is closed.
    pub fn unassign(&mut self, modifier: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_editable()?;
        self.assignee = None;
        self.touch(modifier, clock);
        Ok(())
    }

    /// Moves an open task to [`TaskStatus::InProgress`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] unless the task is
    /// open.
    pub fn start(&mut self, modifier: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::InProgress)?;
        self.touch(modifier, clock);
        Ok(())
    }

    /// Closes the task with a resolution.
    ///
    /// The closer is recorded and also becomes the modifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] if the task is
    /// already closed.
    pub fn close(
        &mut self,
        closer: UserId,
        resolution: TaskResolution,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Closed)?;
        self.resolution = Some(resolution);
        self.closer = Some(closer);
        self.touch(closer, clock);
        Ok(())
    }

    /// Reopens a closed task, clearing its resolution and closer.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] unless the task is
    /// closed.
    pub fn reopen(&mut self, modifier: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Open)?;
        self.resolution = None;
        self.closer = None;
        self.touch(modifier, clock);
        Ok(())
    }

    fn transition_to(&mut self, next: TaskStatus) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    const fn ensure_editable(&self) -> Result<(), TaskDomainError> {
        if matches!(self.status, TaskStatus::Closed) {
            return Err(TaskDomainError::TaskClosed(self.id));
        }
        Ok(())
    }

    /// Records `modifier` and the clock's current time as the latest change.
    fn touch(&mut self, modifier: UserId, clock: &impl Clock) {
        self.modifier = modifier;
        self.modified_at = stamp(clock);
    }
}

/// Timestamps keep microsecond precision, matching `TIMESTAMPTZ`.
const TIMESTAMP_DIGITS: u16 = 6;

fn stamp(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(TIMESTAMP_DIGITS)
}

/// Summary projection returned when listing tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListItem {
    id: TaskId,
    title: TaskTitle,
    status: TaskStatus,
}

impl TaskListItem {
    /// Creates a list item.
    #[must_use]
    pub const fn new(id: TaskId, title: TaskTitle, status: TaskStatus) -> Self {
        Self { id, title, status }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }
}

impl From<&Task> for TaskListItem {
    fn from(task: &Task) -> Self {
        Self::new(task.id(), task.title().clone(), task.status())
    }
}
