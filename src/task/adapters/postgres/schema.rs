//! Diesel schema for task persistence.

diesel::table! {
    /// Task records belonging to a project.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-form description.
        description -> Nullable<Text>,
        /// Board column label.
        #[max_length = 50]
        status -> Varchar,
        /// Priority label.
        #[max_length = 50]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Assignee display name.
        #[max_length = 255]
        assigned_to_name -> Nullable<Varchar>,
        /// Completion timestamp, set while the task is done.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
