//! Diesel schema for sensor persistence.

diesel::table! {
    /// Registered temperature sensors.
    sensors (id) {
        /// Sensor record identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Device key, unique per owner.
        #[max_length = 100]
        sensor_id -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-form description.
        description -> Nullable<Text>,
        /// `active` or `inactive`.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Temperature samples keyed by device key.
    temperature_readings (id) {
        /// Row identifier.
        id -> Int8,
        /// Owning user.
        user_id -> Uuid,
        /// Device key of the reporting sensor.
        #[max_length = 100]
        sensor_id -> Varchar,
        /// Degrees Celsius.
        temperature -> Float8,
        /// When the sample was taken.
        timestamp -> Timestamptz,
    }
}
