//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with lifecycle columns.
    tasks (id) {
        /// Task identifier assigned by the `BIGSERIAL` sequence.
        id -> Int8,
        /// Task title.
        #[max_length = 100]
        title -> Varchar,
        /// Optional task description.
        #[max_length = 500]
        description -> Nullable<Varchar>,
        /// Workflow status.
        #[max_length = 20]
        status -> Varchar,
        /// Resolution of a closed task.
        #[max_length = 20]
        resolution -> Nullable<Varchar>,
        /// User who created the task.
        creator_id -> Int8,
        /// User who last modified the task.
        modifier_id -> Int8,
        /// Assigned user.
        assignee_id -> Nullable<Int8>,
        /// User who closed the task.
        closer_id -> Nullable<Int8>,
        /// Creation timestamp.
        creation_time -> Timestamptz,
        /// Last modification timestamp.
        modification_time -> Timestamptz,
        /// Optimistic locking version.
        version -> Int8,
    }
}

diesel::table! {
    /// Tag reference data.
    tags (id) {
        /// Tag identifier.
        id -> Int8,
        /// Unique tag name.
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    /// Many-to-many association between tasks and tags.
    tasks_tags (task_id, tag_id) {
        /// Associated task.
        task_id -> Int8,
        /// Associated tag.
        tag_id -> Int8,
    }
}

diesel::joinable!(tasks_tags -> tags (tag_id));
diesel::joinable!(tasks_tags -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tags, tasks, tasks_tags);
