//! `PostgreSQL` integration tests for task creation.

use mockable::DefaultClock;
use rstest::rstest;
use tasktracker::task::{
    domain::{NewTask, TaskStatus, TaskTitle, UserId},
    ports::{TaskRepository, TaskRepositoryError},
    services::{CreateTaskRequest, TaskServiceError},
};

use crate::postgres::helpers::{
    BoxError, CREATOR_ID, TaskTestContext, context, count_task_tags, fetch_single_task_row,
    fetch_task_rows,
};

fn create_request() -> CreateTaskRequest {
    CreateTaskRequest::new(CREATOR_ID, "Write integration tests")
        .with_description("Cover the repository against a real database")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_uses_next_free_id(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    let task = ctx.service.create(create_request()).await?;

    assert_eq!(task.id().value(), 1);
    assert_eq!(fetch_single_task_row(&ctx.database)?.id, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_writes_lifecycle_columns(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    let task = ctx.service.create(create_request()).await?;
    let row = fetch_single_task_row(&ctx.database)?;

    assert_eq!(row.creator_id, CREATOR_ID);
    assert_eq!(row.modifier_id, CREATOR_ID);
    assert_eq!(row.creation_time, row.modification_time);
    assert_eq!(row.creation_time, task.created_at());
    assert_eq!(row.version, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_writes_open_status_without_resolution(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    ctx.service.create(create_request()).await?;
    let row = fetch_single_task_row(&ctx.database)?;

    assert_eq!(row.status, "OPEN");
    assert_eq!(row.resolution, None);
    assert_eq!(row.assignee_id, None);
    assert_eq!(row.closer_id, None);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_writes_in_progress_status(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    ctx.service
        .create(create_request().with_status(TaskStatus::InProgress))
        .await?;

    assert_eq!(fetch_single_task_row(&ctx.database)?.status, "IN_PROGRESS");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_writes_title_and_description(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    ctx.service.create(create_request()).await?;
    let row = fetch_single_task_row(&ctx.database)?;

    assert_eq!(row.title, "Write integration tests");
    assert_eq!(
        row.description.as_deref(),
        Some("Cover the repository against a real database")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_stores_blank_description_as_null(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    ctx.service
        .create(CreateTaskRequest::new(CREATOR_ID, "No details").with_description("   "))
        .await?;

    assert_eq!(fetch_single_task_row(&ctx.database)?.description, None);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_writes_no_tag_links(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    ctx.service.create(create_request()).await?;

    assert_eq!(count_task_tags(&ctx.database)?, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_returns_persisted_task(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    let task = ctx.service.create(create_request()).await?;

    assert_eq!(task.title().as_str(), "Write integration tests");
    assert_eq!(
        task.description().map(|description| description.as_str()),
        Some("Cover the repository against a real database")
    );
    assert_eq!(task.status(), TaskStatus::Open);
    assert_eq!(task.creator(), UserId::new(CREATOR_ID)?);
    assert_eq!(task.modifier(), task.creator());
    assert_eq!(task.resolution(), None);
    assert_eq!(task.assignee(), None);
    assert_eq!(task.closer(), None);
    assert!(task.tags().is_empty());
    assert_eq!(task.version(), 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_rejects_unknown_creator_without_writing(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    let result = ctx
        .service
        .create(CreateTaskRequest::new(99, "Orphaned task"))
        .await;

    match result {
        Err(TaskServiceError::Repository(TaskRepositoryError::UnknownUser(user))) => {
            assert_eq!(user.value(), 99);
        }
        other => return Err(format!("expected unknown user error, got {other:?}").into()),
    }
    assert!(fetch_task_rows(&ctx.database)?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TASKTRACKER_TEST_DATABASE_URL"]
async fn create_returns_exact_creation_timestamp(
    context: Result<TaskTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let new_task = NewTask::new(
        UserId::new(CREATOR_ID)?,
        TaskTitle::new("Stamp me")?,
        None,
        TaskStatus::Open,
        &DefaultClock,
    )?;

    let created = ctx.repository.create(&new_task).await?;
    let reloaded = ctx
        .repository
        .find_by_id(created.id())
        .await?
        .ok_or("created task should be readable")?;

    assert_eq!(created.created_at(), new_task.created_at());
    assert_eq!(created.modified_at(), new_task.created_at());
    assert_eq!(reloaded.created_at(), new_task.created_at());
    Ok(())
}
