//! Shared test helpers for in-memory repository integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::io;
use std::sync::Arc;
use tasktracker::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, UserId},
    services::{CreateTaskRequest, TaskService},
};
use tokio::runtime::Runtime;

/// Service type shared by the in-memory tests.
pub type TestService = TaskService<InMemoryTaskRepository, DefaultClock>;

/// Registered user who creates tasks.
pub const AUTHOR_ID: i64 = 1;

/// Second registered user.
pub const REVIEWER_ID: i64 = 2;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a repository that knows the author and reviewer.
///
/// # Errors
///
/// Returns an error if a seeded user identifier is invalid.
#[fixture]
pub fn repo() -> eyre::Result<Arc<InMemoryTaskRepository>> {
    let users = [UserId::new(AUTHOR_ID)?, UserId::new(REVIEWER_ID)?];
    Ok(Arc::new(InMemoryTaskRepository::with_users(users)))
}

/// Builds a service over `repo` with the system clock.
pub fn service_for(repo: &Arc<InMemoryTaskRepository>) -> TestService {
    TaskService::new(Arc::clone(repo), Arc::new(DefaultClock))
}

/// Creates an open task authored by [`AUTHOR_ID`].
///
/// # Errors
///
/// Returns an error if the service rejects the task.
pub fn create_task(rt: &Runtime, service: &TestService, title: &str) -> eyre::Result<Task> {
    Ok(rt.block_on(service.create(CreateTaskRequest::new(AUTHOR_ID, title)))?)
}
