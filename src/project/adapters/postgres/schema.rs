//! Diesel schema for project persistence.

diesel::table! {
    /// Projects owned by dashboard users.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-form description.
        description -> Nullable<Text>,
        /// Status label.
        #[max_length = 50]
        status -> Varchar,
        /// Planned start date.
        start_date -> Nullable<Date>,
        /// Planned end date.
        end_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
