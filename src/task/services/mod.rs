//! Application services for task orchestration.

mod lifecycle;

pub use lifecycle::{
    CloseTaskRequest, CreateTaskRequest, TaskService, TaskServiceError, TaskServiceResult,
    UpdateTaskRequest,
};
