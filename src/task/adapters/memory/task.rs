//! In-memory task repository for tests and embedding.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{NewTask, PersistedTaskData, Tag, Task, TaskId, TaskListItem, UserId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Mirrors the relational adapter: identifiers come from a sequence starting
/// at one, referenced users must be registered, and updates are guarded by
/// the version column.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug)]
struct InMemoryTaskState {
    next_id: i64,
    users: HashSet<UserId>,
    tasks: BTreeMap<TaskId, Task>,
}

impl Default for InMemoryTaskState {
    fn default() -> Self {
        Self {
            next_id: 1,
            users: HashSet::new(),
            tasks: BTreeMap::new(),
        }
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty repository with no registered users.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
        }
    }

    /// Creates an empty repository that knows the given users.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = UserId>) -> Self {
        let state = InMemoryTaskState {
            users: users.into_iter().collect(),
            ..InMemoryTaskState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Associates a tag with a stored task.
    ///
    /// Attaching a tag that is already present is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn attach_tag(&self, task_id: TaskId, tag: Tag) -> TaskRepositoryResult<()> {
        let mut state = write_state(&self.state)?;
        let task = state
            .tasks
            .remove(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;

        let mut data = task.into_persisted();
        if !data.tags.iter().any(|existing| existing.id() == tag.id()) {
            data.tags.push(tag);
        }
        state.tasks.insert(task_id, Task::from_persisted(data));
        Ok(())
    }
}

fn read_state(
    state: &RwLock<InMemoryTaskState>,
) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
    state
        .read()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

fn write_state(
    state: &RwLock<InMemoryTaskState>,
) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
    state
        .write()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

/// Returns the first referenced user that is not registered.
fn first_unknown_user(
    users: &HashSet<UserId>,
    referenced: impl IntoIterator<Item = UserId>,
) -> Option<UserId> {
    referenced.into_iter().find(|user| !users.contains(user))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, new_task: &NewTask) -> TaskRepositoryResult<Task> {
        let mut state = write_state(&self.state)?;
        if let Some(unknown) = first_unknown_user(&state.users, [new_task.creator()]) {
            return Err(TaskRepositoryError::UnknownUser(unknown));
        }

        let id = TaskId::new(state.next_id).map_err(TaskRepositoryError::persistence)?;
        state.next_id += 1;

        let task = Task::from_persisted(PersistedTaskData {
            id,
            title: new_task.title().clone(),
            description: new_task.description().cloned(),
            status: new_task.status(),
            resolution: None,
            creator: new_task.creator(),
            modifier: new_task.creator(),
            assignee: None,
            closer: None,
            tags: Vec::new(),
            created_at: new_task.created_at(),
            modified_at: new_task.created_at(),
            version: 0,
        });
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = read_state(&self.state)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> TaskRepositoryResult<Vec<TaskListItem>> {
        let state = read_state(&self.state)?;
        Ok(state.tasks.values().map(TaskListItem::from).collect())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let mut state = write_state(&self.state)?;
        let stored = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .clone();

        if stored.version() != task.version() {
            return Err(TaskRepositoryError::ConcurrentModification {
                id: task.id(),
                expected: task.version(),
            });
        }

        let referenced = [Some(task.modifier()), task.assignee(), task.closer()];
        if let Some(unknown) = first_unknown_user(&state.users, referenced.into_iter().flatten())
        {
            return Err(TaskRepositoryError::UnknownUser(unknown));
        }

        // Creator, creation time and tags are owned by the stored row.
        let stored_data = stored.into_persisted();
        let changed = task.clone().into_persisted();
        let updated = Task::from_persisted(PersistedTaskData {
            creator: stored_data.creator,
            created_at: stored_data.created_at,
            tags: stored_data.tags,
            version: stored_data.version + 1,
            ..changed
        });
        state.tasks.insert(updated.id(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let mut state = write_state(&self.state)?;
        state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}
