//! Domain model for task tracking.
//!
//! The domain validates task values and enforces the open, in-progress and
//! closed workflow while keeping all infrastructure concerns outside of the
//! domain boundary.

mod error;
mod ids;
mod status;
mod tag;
mod task;
mod text;

pub use error::{ParseTaskResolutionError, ParseTaskStatusError, TaskDomainError};
pub use ids::{TagId, TaskId, UserId};
pub use status::{TaskResolution, TaskStatus};
pub use tag::Tag;
pub use task::{NewTask, PersistedTaskData, Task, TaskListItem};
pub use text::{TaskDescription, TaskTitle};
