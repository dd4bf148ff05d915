//! Identifier types for the task domain.
//!
//! All identifiers map to `BIGSERIAL` columns, so only positive values are
//! accepted.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident => $error:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a validated identifier.
            ///
            /// # Errors
            ///
            #[doc = concat!(
                "Returns [`TaskDomainError::",
                stringify!($error),
                "`] when the value is zero or negative."
            )]
            pub const fn new(value: i64) -> Result<Self, TaskDomainError> {
                if value <= 0 {
                    return Err(TaskDomainError::$error(value));
                }
                Ok(Self(value))
            }

            /// Returns the underlying numeric value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(
    /// Identifier of a persisted task, assigned by the repository.
    TaskId => InvalidTaskId
);

positive_id!(
    /// Identifier of a registered user acting as creator, modifier, assignee
    /// or closer.
    UserId => InvalidUserId
);

positive_id!(
    /// Identifier of a tag.
    TagId => InvalidTagId
);
