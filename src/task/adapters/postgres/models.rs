//! Diesel row models for task persistence.

use super::schema::{tags, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Resolution of a closed task.
    pub resolution: Option<String>,
    /// Creating user.
    pub creator_id: i64,
    /// Last modifying user.
    pub modifier_id: i64,
    /// Assigned user.
    pub assignee_id: Option<i64>,
    /// Closing user.
    pub closer_id: Option<i64>,
    /// Creation timestamp.
    pub creation_time: DateTime<Utc>,
    /// Last modification timestamp.
    pub modification_time: DateTime<Utc>,
    /// Optimistic locking version.
    pub version: i64,
}

/// Insert model for task records.
///
/// The identifier comes from the table sequence; resolution, assignee and
/// closer are left `NULL`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial workflow status.
    pub status: String,
    /// Creating user.
    pub creator_id: i64,
    /// First modifier, always the creator.
    pub modifier_id: i64,
    /// Creation timestamp.
    pub creation_time: DateTime<Utc>,
    /// First modification timestamp, always the creation timestamp.
    pub modification_time: DateTime<Utc>,
    /// Initial version.
    pub version: i64,
}

/// Change set written by updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Resolution of a closed task.
    pub resolution: Option<String>,
    /// Last modifying user.
    pub modifier_id: i64,
    /// Assigned user.
    pub assignee_id: Option<i64>,
    /// Closing user.
    pub closer_id: Option<i64>,
    /// Last modification timestamp.
    pub modification_time: DateTime<Utc>,
    /// Next version.
    pub version: i64,
}

/// Summary row used for task listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskListRow {
    /// Task identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Workflow status.
    pub status: String,
}

/// Tag row joined through `tasks_tags`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TagRow {
    /// Tag identifier.
    pub id: i64,
    /// Tag name.
    pub name: String,
}
