//! Diesel row models for sensor persistence.

use super::schema::{sensors, temperature_readings};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for sensor records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sensors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SensorRow {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub sensor_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for sensor records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sensors)]
pub struct NewSensorRow {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub sensor_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the editable sensor columns; the key is not among them.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sensors)]
#[diesel(treat_none_as_null = true)]
pub struct SensorChangeset {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for readings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = temperature_readings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReadingRow {
    pub user_id: uuid::Uuid,
    pub sensor_id: String,
    pub temperature: f64,
    pub timestamp: DateTime<Utc>,
}

/// Insert model for readings; the row id is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = temperature_readings)]
pub struct NewReadingRow {
    pub user_id: uuid::Uuid,
    pub sensor_id: String,
    pub temperature: f64,
    pub timestamp: DateTime<Utc>,
}
