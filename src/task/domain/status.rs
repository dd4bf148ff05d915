//! Task workflow status and resolution.

use super::{ParseTaskResolutionError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is waiting to be picked up.
    Open,
    /// Someone is working on the task.
    InProgress,
    /// Task has been closed with a resolution.
    Closed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Closed => "CLOSED",
        }
    }

    /// Returns whether the workflow permits moving from `self` to `next`.
    ///
    /// Open tasks can be started, open and in-progress tasks can be closed,
    /// and closed tasks can be reopened. Self-transitions are rejected.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::InProgress | Self::Closed)
                | (Self::InProgress, Self::Closed)
                | (Self::Closed, Self::Open)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Reason a task was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskResolution {
    /// The work was completed.
    Done,
    /// The task duplicates another task.
    Duplicate,
    /// The task will not be worked on.
    WontDo,
}

impl TaskResolution {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "DONE",
            Self::Duplicate => "DUPLICATE",
            Self::WontDo => "WONT_DO",
        }
    }
}

impl fmt::Display for TaskResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskResolution {
    type Error = ParseTaskResolutionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "DONE" => Ok(Self::Done),
            "DUPLICATE" => Ok(Self::Duplicate),
            "WONT_DO" => Ok(Self::WontDo),
            _ => Err(ParseTaskResolutionError(value.to_owned())),
        }
    }
}
