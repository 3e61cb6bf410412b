//! `PostgreSQL` repository implementations for sensors and readings.

use super::{
    models::{NewReadingRow, NewSensorRow, ReadingRow, SensorChangeset, SensorRow},
    schema::{sensors, temperature_readings},
};
use crate::sensor::{
    domain::{
        PersistedSensorData, Sensor, SensorId, SensorKey, SensorStatus, TemperatureReading,
    },
    ports::{ReadingRepository, SensorRepository, SensorRepositoryError, SensorRepositoryResult},
};
use crate::session::domain::UserId;
use crate::store::{PgPool, StoreError, run_blocking};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl From<StoreError> for SensorRepositoryError {
    fn from(err: StoreError) -> Self {
        Self::persistence(err)
    }
}

async fn run<F, T>(pool: &PgPool, f: F) -> SensorRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> SensorRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    run_blocking(pool, f).await
}

/// `PostgreSQL`-backed sensor repository.
#[derive(Debug, Clone)]
pub struct PostgresSensorRepository {
    pool: PgPool,
}

impl PostgresSensorRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SensorRepository for PostgresSensorRepository {
    async fn list_for_owner(&self, owner: UserId) -> SensorRepositoryResult<Vec<Sensor>> {
        run(&self.pool, move |connection| {
            let rows = sensors::table
                .filter(sensors::user_id.eq(owner.into_inner()))
                .order(sensors::created_at.desc())
                .select(SensorRow::as_select())
                .load::<SensorRow>(connection)
                .map_err(SensorRepositoryError::persistence)?;
            rows.into_iter().map(row_to_sensor).collect()
        })
        .await
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: SensorId,
    ) -> SensorRepositoryResult<Option<Sensor>> {
        run(&self.pool, move |connection| {
            let row = sensors::table
                .filter(sensors::id.eq(id.into_inner()))
                .filter(sensors::user_id.eq(owner.into_inner()))
                .select(SensorRow::as_select())
                .first::<SensorRow>(connection)
                .optional()
                .map_err(SensorRepositoryError::persistence)?;
            row.map(row_to_sensor).transpose()
        })
        .await
    }

    async fn insert(&self, sensor: &Sensor) -> SensorRepositoryResult<()> {
        let sensor_id = sensor.id();
        let key = sensor.key().clone();
        let new_row = NewSensorRow {
            id: sensor_id.into_inner(),
            user_id: sensor.owner().into_inner(),
            sensor_id: key.as_str().to_owned(),
            name: sensor.name().to_owned(),
            description: sensor.description().map(str::to_owned),
            status: sensor.status().as_str().to_owned(),
            created_at: sensor.created_at(),
            updated_at: sensor.updated_at(),
        };
        run(&self.pool, move |connection| {
            diesel::insert_into(sensors::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some("sensors_pkey") =>
                    {
                        SensorRepositoryError::DuplicateSensor(sensor_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        SensorRepositoryError::DuplicateKey(key)
                    }
                    _ => SensorRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, owner: UserId, sensor: &Sensor) -> SensorRepositoryResult<()> {
        let sensor_id = sensor.id();
        let changes = SensorChangeset {
            name: sensor.name().to_owned(),
            description: sensor.description().map(str::to_owned),
            status: sensor.status().as_str().to_owned(),
            updated_at: sensor.updated_at(),
        };
        run(&self.pool, move |connection| {
            let affected = diesel::update(
                sensors::table
                    .filter(sensors::id.eq(sensor_id.into_inner()))
                    .filter(sensors::user_id.eq(owner.into_inner())),
            )
            .set(&changes)
            .execute(connection)
            .map_err(SensorRepositoryError::persistence)?;
            if affected == 0 {
                return Err(SensorRepositoryError::NotFound(sensor_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, owner: UserId, id: SensorId) -> SensorRepositoryResult<()> {
        run(&self.pool, move |connection| {
            let affected = diesel::delete(
                sensors::table
                    .filter(sensors::id.eq(id.into_inner()))
                    .filter(sensors::user_id.eq(owner.into_inner())),
            )
            .execute(connection)
            .map_err(SensorRepositoryError::persistence)?;
            if affected == 0 {
                return Err(SensorRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

/// `PostgreSQL`-backed reading repository.
#[derive(Debug, Clone)]
pub struct PostgresReadingRepository {
    pool: PgPool,
}

impl PostgresReadingRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingRepository for PostgresReadingRepository {
    async fn list_for_sensor(
        &self,
        owner: UserId,
        key: &SensorKey,
    ) -> SensorRepositoryResult<Vec<TemperatureReading>> {
        let key = key.as_str().to_owned();
        run(&self.pool, move |connection| {
            let rows = temperature_readings::table
                .filter(temperature_readings::user_id.eq(owner.into_inner()))
                .filter(temperature_readings::sensor_id.eq(key))
                .order(temperature_readings::timestamp.asc())
                .select(ReadingRow::as_select())
                .load::<ReadingRow>(connection)
                .map_err(SensorRepositoryError::persistence)?;
            rows.into_iter().map(row_to_reading).collect()
        })
        .await
    }

    async fn latest_for_sensors(
        &self,
        owner: UserId,
        keys: &[SensorKey],
    ) -> SensorRepositoryResult<Vec<TemperatureReading>> {
        let keys: Vec<String> = keys.iter().map(|key| key.as_str().to_owned()).collect();
        run(&self.pool, move |connection| {
            let rows = temperature_readings::table
                .filter(temperature_readings::user_id.eq(owner.into_inner()))
                .filter(temperature_readings::sensor_id.eq_any(keys))
                .distinct_on(temperature_readings::sensor_id)
                .order((
                    temperature_readings::sensor_id.asc(),
                    temperature_readings::timestamp.desc(),
                ))
                .select(ReadingRow::as_select())
                .load::<ReadingRow>(connection)
                .map_err(SensorRepositoryError::persistence)?;
            rows.into_iter().map(row_to_reading).collect()
        })
        .await
    }

    async fn insert(&self, reading: &TemperatureReading) -> SensorRepositoryResult<()> {
        let new_row = NewReadingRow {
            user_id: reading.owner().into_inner(),
            sensor_id: reading.sensor_key().as_str().to_owned(),
            temperature: reading.temperature(),
            timestamp: reading.timestamp(),
        };
        run(&self.pool, move |connection| {
            diesel::insert_into(temperature_readings::table)
                .values(&new_row)
                .execute(connection)
                .map_err(SensorRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_for_sensor(
        &self,
        owner: UserId,
        key: &SensorKey,
    ) -> SensorRepositoryResult<usize> {
        let key = key.as_str().to_owned();
        run(&self.pool, move |connection| {
            diesel::delete(
                temperature_readings::table
                    .filter(temperature_readings::user_id.eq(owner.into_inner()))
                    .filter(temperature_readings::sensor_id.eq(key)),
            )
            .execute(connection)
            .map_err(SensorRepositoryError::persistence)
        })
        .await
    }
}

fn row_to_sensor(row: SensorRow) -> SensorRepositoryResult<Sensor> {
    let status =
        SensorStatus::try_from(row.status.as_str()).map_err(SensorRepositoryError::persistence)?;
    let key = SensorKey::new(&row.sensor_id).map_err(SensorRepositoryError::persistence)?;
    Ok(Sensor::from_persisted(PersistedSensorData {
        id: SensorId::from_uuid(row.id),
        owner: UserId::from_uuid(row.user_id),
        key,
        name: row.name,
        description: row.description,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_reading(row: ReadingRow) -> SensorRepositoryResult<TemperatureReading> {
    let key = SensorKey::new(&row.sensor_id).map_err(SensorRepositoryError::persistence)?;
    TemperatureReading::new(
        UserId::from_uuid(row.user_id),
        key,
        row.temperature,
        row.timestamp,
    )
    .map_err(SensorRepositoryError::persistence)
}
