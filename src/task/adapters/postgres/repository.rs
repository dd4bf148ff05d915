//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TagRow, TaskChangeset, TaskListRow, TaskRow},
    schema::{tags, tasks, tasks_tags},
};
use crate::task::{
    domain::{
        NewTask, PersistedTaskData, Tag, TagId, Task, TaskDescription, TaskId, TaskListItem,
        TaskResolution, TaskStatus, TaskTitle, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, new_task: &NewTask) -> TaskRepositoryResult<Task> {
        let creator = new_task.creator();
        let references = UserReferences {
            creator: Some(creator),
            modifier: Some(creator),
            assignee: None,
            closer: None,
        };
        let new_row = to_new_row(new_task);

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                let id = diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .returning(tasks::id)
                    .get_result::<i64>(tx)
                    .map_err(|err| map_write_error(err, &references))?;
                debug!(task_id = id, creator = %creator, "inserted task row");

                load_task(tx, id)?.ok_or_else(|| missing_after_write(id))
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| load_task(connection, id.value()))
            .await
    }

    async fn find_all(&self) -> TaskRepositoryResult<Vec<TaskListItem>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order(tasks::id.asc())
                .select(TaskListRow::as_select())
                .load::<TaskListRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_list_item).collect()
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let id = task.id();
        let expected = task.version();
        let references = UserReferences {
            creator: None,
            modifier: Some(task.modifier()),
            assignee: task.assignee(),
            closer: task.closer(),
        };
        let changes = to_changeset(task);

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                let affected = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(id.value()))
                        .filter(tasks::version.eq(expected)),
                )
                .set(&changes)
                .execute(tx)
                .map_err(|err| map_write_error(err, &references))?;

                if affected == 0 {
                    return Err(classify_missed_update(tx, id, expected));
                }
                debug!(task_id = %id, version = changes.version, "updated task row");

                load_task(tx, id.value())?.ok_or_else(|| missing_after_write(id.value()))
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                let task = load_task(tx, id.value())?.ok_or(TaskRepositoryError::NotFound(id))?;

                diesel::delete(tasks_tags::table.filter(tasks_tags::task_id.eq(id.value())))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                diesel::delete(tasks::table.find(id.value()))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                debug!(task_id = %id, "deleted task row");

                Ok(task)
            })
        })
        .await
    }
}

/// Users referenced by a write, keyed by the foreign key that guards them.
#[derive(Debug, Clone, Copy)]
struct UserReferences {
    creator: Option<UserId>,
    modifier: Option<UserId>,
    assignee: Option<UserId>,
    closer: Option<UserId>,
}

impl UserReferences {
    fn for_constraint(&self, constraint: Option<&str>) -> Option<UserId> {
        match constraint? {
            "fk_tasks_creator" => self.creator,
            "fk_tasks_modifier" => self.modifier,
            "fk_tasks_assignee" => self.assignee,
            "fk_tasks_closer" => self.closer,
            _ => None,
        }
    }
}

fn map_write_error(err: DieselError, references: &UserReferences) -> TaskRepositoryError {
    let unknown_user = match &err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            references.for_constraint(info.constraint_name())
        }
        _ => None,
    };
    unknown_user.map_or_else(
        || TaskRepositoryError::persistence(err),
        TaskRepositoryError::UnknownUser,
    )
}

/// Explains why a version-guarded update touched no rows.
fn classify_missed_update(
    connection: &mut PgConnection,
    id: TaskId,
    expected: i64,
) -> TaskRepositoryError {
    match diesel::select(exists(tasks::table.find(id.value()))).get_result::<bool>(connection) {
        Ok(true) => TaskRepositoryError::ConcurrentModification { id, expected },
        Ok(false) => TaskRepositoryError::NotFound(id),
        Err(err) => TaskRepositoryError::persistence(err),
    }
}

fn missing_after_write(id: i64) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(format!(
        "task {id} was not readable after write"
    )))
}

fn load_task(connection: &mut PgConnection, id: i64) -> TaskRepositoryResult<Option<Task>> {
    let row = tasks::table
        .find(id)
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)?;
    let Some(task_row) = row else {
        return Ok(None);
    };

    let tag_rows = tasks_tags::table
        .inner_join(tags::table)
        .filter(tasks_tags::task_id.eq(id))
        .order(tags::name.asc())
        .select(TagRow::as_select())
        .load::<TagRow>(connection)
        .map_err(TaskRepositoryError::persistence)?;

    row_to_task(task_row, tag_rows).map(Some)
}

fn to_new_row(new_task: &NewTask) -> NewTaskRow {
    NewTaskRow {
        title: new_task.title().as_str().to_owned(),
        description: new_task.description().map(|text| text.as_str().to_owned()),
        status: new_task.status().as_str().to_owned(),
        creator_id: new_task.creator().value(),
        modifier_id: new_task.creator().value(),
        creation_time: new_task.created_at(),
        modification_time: new_task.created_at(),
        version: 0,
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(|text| text.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        resolution: task.resolution().map(|value| value.as_str().to_owned()),
        modifier_id: task.modifier().value(),
        assignee_id: task.assignee().map(UserId::value),
        closer_id: task.closer().map(UserId::value),
        modification_time: task.modified_at(),
        version: task.version() + 1,
    }
}

fn row_to_task(row: TaskRow, tag_rows: Vec<TagRow>) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        resolution,
        creator_id,
        modifier_id,
        assignee_id,
        closer_id,
        creation_time,
        modification_time,
        version,
    } = row;

    let tags = tag_rows
        .into_iter()
        .map(|tag_row| TagId::new(tag_row.id).map(|tag_id| Tag::new(tag_id, tag_row.name)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(TaskRepositoryError::persistence)?,
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description: description
            .map(TaskDescription::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?
            .flatten(),
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        resolution: resolution
            .as_deref()
            .map(TaskResolution::try_from)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        creator: UserId::new(creator_id).map_err(TaskRepositoryError::persistence)?,
        modifier: UserId::new(modifier_id).map_err(TaskRepositoryError::persistence)?,
        assignee: assignee_id
            .map(UserId::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        closer: closer_id
            .map(UserId::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        tags,
        created_at: creation_time,
        modified_at: modification_time,
        version,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_list_item(row: TaskListRow) -> TaskRepositoryResult<TaskListItem> {
    let id = TaskId::new(row.id).map_err(TaskRepositoryError::persistence)?;
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(TaskListItem::new(id, title, status))
}
