//! Shared test helpers for `PostgreSQL` integration tests.
//!
//! Tests run against the server named by `TASKTRACKER_TEST_DATABASE_URL`.
//! They are ignored by default; run them with `cargo test -- --ignored`.
//! Every test gets its own schema, so the `tasks.id` sequence always starts
//! at one.

use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tasktracker::config::DatabaseSettings;
use tasktracker::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    services::TaskService,
};
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the server used by these tests.
pub const TEST_DATABASE_URL_ENV: &str = "TASKTRACKER_TEST_DATABASE_URL";

/// SQL to create the task tables.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_task_tables/up.sql");

/// Registered users available to every test.
pub const SEED_USERS_SQL: &str = concat!(
    "INSERT INTO users (id, name) VALUES ",
    "(1, 'John Doe'), ",
    "(2, 'Anne Admin');",
);

/// User who creates the task in creation tests.
pub const CREATOR_ID: i64 = 1;

/// Second registered user.
pub const OTHER_USER_ID: i64 = 2;

/// Schema-scoped database that is dropped with the guard.
pub struct TestDatabase {
    server_url: String,
    schema: String,
    settings: DatabaseSettings,
}

impl TestDatabase {
    /// Creates a fresh schema, applies the migration and seeds users.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or the migration fails.
    pub fn create(server_url: &str) -> Result<Self, BoxError> {
        let schema = format!("test_{}", Uuid::new_v4().simple());
        let mut conn = PgConnection::establish(server_url)?;
        conn.batch_execute(&format!("CREATE SCHEMA {schema}"))?;

        let database = Self {
            server_url: server_url.to_owned(),
            settings: DatabaseSettings {
                url: with_search_path(server_url, &schema),
                max_connections: 1,
                connection_timeout_secs: 10,
            },
            schema,
        };
        let mut scoped = database.connection()?;
        scoped.batch_execute(CREATE_SCHEMA_SQL)?;
        scoped.batch_execute(SEED_USERS_SQL)?;
        Ok(database)
    }

    /// Opens a connection scoped to the test schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn connection(&self) -> Result<PgConnection, BoxError> {
        Ok(PgConnection::establish(&self.settings.url)?)
    }

    /// Builds the repository pool from the schema-scoped settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn pool(&self) -> Result<TaskPgPool, BoxError> {
        Ok(self.settings.build_pool()?)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Ok(mut conn) = PgConnection::establish(&self.server_url) {
            drop(conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema)));
        }
    }
}

/// Appends a libpq `options` parameter that pins `search_path` to `schema`.
fn with_search_path(server_url: &str, schema: &str) -> String {
    let separator = if server_url.contains('?') { '&' } else { '?' };
    format!("{server_url}{separator}options=-csearch_path%3D{schema}")
}

/// Repository and service wired to a fresh test schema.
pub struct TaskTestContext {
    pub repository: Arc<PostgresTaskRepository>,
    pub service: TaskService<PostgresTaskRepository, DefaultClock>,
    pub database: TestDatabase,
}

/// Provides a test context on a fresh schema.
///
/// Fails when `TASKTRACKER_TEST_DATABASE_URL` is unset.
#[fixture]
pub fn context() -> Result<TaskTestContext, BoxError> {
    let url = std::env::var(TEST_DATABASE_URL_ENV)
        .map_err(|_| format!("{TEST_DATABASE_URL_ENV} must name a PostgreSQL server"))?;

    let database = TestDatabase::create(&url)?;
    let repository = Arc::new(PostgresTaskRepository::new(database.pool()?));
    let service = TaskService::new(repository.clone(), Arc::new(DefaultClock));
    Ok(TaskTestContext {
        repository,
        service,
        database,
    })
}

/// Raw `tasks` row used to assert exact column values.
#[derive(diesel::QueryableByName, Debug)]
pub struct TaskTableRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub id: i64,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub title: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub description: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub status: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub resolution: Option<String>,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub creator_id: i64,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub modifier_id: i64,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::BigInt>)]
    pub assignee_id: Option<i64>,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::BigInt>)]
    pub closer_id: Option<i64>,
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub creation_time: DateTime<Utc>,
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub modification_time: DateTime<Utc>,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub version: i64,
}

/// Reads every `tasks` row ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn fetch_task_rows(database: &TestDatabase) -> Result<Vec<TaskTableRow>, BoxError> {
    let mut conn = database.connection()?;
    let rows = diesel::sql_query(concat!(
        "SELECT id, title, description, status, resolution, creator_id, modifier_id, ",
        "assignee_id, closer_id, creation_time, modification_time, version ",
        "FROM tasks ORDER BY id",
    ))
    .load::<TaskTableRow>(&mut conn)?;
    Ok(rows)
}

/// Reads the only `tasks` row, failing if there is not exactly one.
///
/// # Errors
///
/// Returns an error if the query fails or the row count is not one.
pub fn fetch_single_task_row(database: &TestDatabase) -> Result<TaskTableRow, BoxError> {
    let mut rows = fetch_task_rows(database)?;
    if rows.len() != 1 {
        return Err(format!("expected exactly one task row, found {}", rows.len()).into());
    }
    rows.pop().ok_or_else(|| "expected a task row".into())
}

#[derive(diesel::QueryableByName)]
struct CountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

/// Counts `tasks_tags` rows.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_task_tags(database: &TestDatabase) -> Result<i64, BoxError> {
    let mut conn = database.connection()?;
    let row = diesel::sql_query("SELECT COUNT(*) AS count FROM tasks_tags")
        .get_result::<CountRow>(&mut conn)?;
    Ok(row.count)
}

/// Inserts a tag and links it to a task.
///
/// # Errors
///
/// Returns an error if either insert fails.
pub fn tag_task(
    database: &TestDatabase,
    task_id: i64,
    tag_id: i64,
    name: &str,
) -> Result<(), BoxError> {
    let mut conn = database.connection()?;
    diesel::sql_query("INSERT INTO tags (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind::<diesel::sql_types::BigInt, _>(tag_id)
        .bind::<diesel::sql_types::Text, _>(name)
        .execute(&mut conn)?;
    diesel::sql_query("INSERT INTO tasks_tags (task_id, tag_id) VALUES ($1, $2)")
        .bind::<diesel::sql_types::BigInt, _>(task_id)
        .bind::<diesel::sql_types::BigInt, _>(tag_id)
        .execute(&mut conn)?;
    Ok(())
}
