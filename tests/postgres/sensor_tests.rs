//! Sensor and reading repository tests against `PostgreSQL`.

use crate::postgres::helpers::{SteppingClock, TestDatabase, clock};
use chrono::Duration;
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskpulse::sensor::{
    adapters::postgres::{PostgresReadingRepository, PostgresSensorRepository},
    domain::{Sensor, SensorDraft, SensorKey, TemperatureReading},
    ports::{ReadingRepository, SensorRepository, SensorRepositoryError},
};
use taskpulse::session::domain::UserId;

struct Fleet {
    db: TestDatabase,
    sensors: PostgresSensorRepository,
    readings: PostgresReadingRepository,
    owner: UserId,
}

impl Fleet {
    fn create(cluster: &'static TestCluster, label: &str) -> Self {
        let db = TestDatabase::create(cluster, label);
        Self {
            sensors: PostgresSensorRepository::new(db.pool.clone()),
            readings: PostgresReadingRepository::new(db.pool.clone()),
            db,
            owner: UserId::new(),
        }
    }

    fn sensor(&self, owner: UserId, key: &str, clock: &SteppingClock) -> Sensor {
        let draft = SensorDraft::new(key, "Estufa").expect("valid sensor");
        let sensor = Sensor::create(owner, draft, clock);
        clock.advance(Duration::minutes(1));
        self.db
            .rt
            .block_on(self.sensors.insert(&sensor))
            .expect("insert sensor");
        sensor
    }

    fn reading(&self, owner: UserId, key: &str, temperature: f64, clock: &SteppingClock) {
        let key = SensorKey::new(key).expect("valid key");
        let reading =
            TemperatureReading::new(owner, key, temperature, clock.utc()).expect("finite");
        clock.advance(Duration::minutes(10));
        self.db
            .rt
            .block_on(self.readings.insert(&reading))
            .expect("insert reading");
    }
}

fn key(raw: &str) -> SensorKey {
    SensorKey::new(raw).expect("valid key")
}

#[rstest]
fn list_for_owner_returns_newest_first(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let fleet = Fleet::create(shared_test_cluster, "sensor_order");
    let older = fleet.sensor(fleet.owner, "ESP32_A", &clock);
    let newer = fleet.sensor(fleet.owner, "ESP32_B", &clock);
    fleet.sensor(UserId::new(), "ESP32_C", &clock);

    let listed = fleet
        .db
        .rt
        .block_on(fleet.sensors.list_for_owner(fleet.owner))
        .expect("list");

    assert_eq!(listed, vec![newer, older]);
}

#[rstest]
fn duplicate_key_is_per_owner(clock: SteppingClock, shared_test_cluster: &'static TestCluster) {
    let fleet = Fleet::create(shared_test_cluster, "sensor_key");
    fleet.sensor(fleet.owner, "ESP32_A", &clock);
    fleet.sensor(UserId::new(), "ESP32_A", &clock);

    let draft = SensorDraft::new("ESP32_A", "Cópia").expect("valid sensor");
    let clash = Sensor::create(fleet.owner, draft, &clock);
    let result = fleet.db.rt.block_on(fleet.sensors.insert(&clash));

    assert!(
        matches!(&result, Err(SensorRepositoryError::DuplicateKey(k)) if *k == key("ESP32_A")),
        "expected DuplicateKey, got: {result:?}"
    );
}

#[rstest]
fn duplicate_identifier_is_not_mistaken_for_a_key_clash(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let fleet = Fleet::create(shared_test_cluster, "sensor_pkey");
    let sensor = fleet.sensor(fleet.owner, "ESP32_A", &clock);

    let result = fleet.db.rt.block_on(fleet.sensors.insert(&sensor));

    assert!(
        matches!(result, Err(SensorRepositoryError::DuplicateSensor(id)) if id == sensor.id()),
        "expected DuplicateSensor, got: {result:?}"
    );
}

#[rstest]
fn update_is_scoped_to_the_given_owner(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let fleet = Fleet::create(shared_test_cluster, "sensor_update");
    let sensor = fleet.sensor(fleet.owner, "ESP32_A", &clock);
    let mut renamed = sensor.clone();
    let draft = SensorDraft::new("ESP32_A", "Câmara fria").expect("valid sensor");
    renamed.apply(draft, &clock).expect("same key");

    let stolen = fleet.db.rt.block_on(fleet.sensors.update(UserId::new(), &renamed));
    assert!(matches!(stolen, Err(SensorRepositoryError::NotFound(id)) if id == sensor.id()));
    let untouched = fleet
        .db
        .rt
        .block_on(fleet.sensors.find_for_owner(fleet.owner, sensor.id()))
        .expect("find");
    assert_eq!(untouched, Some(sensor));

    fleet
        .db
        .rt
        .block_on(fleet.sensors.update(fleet.owner, &renamed))
        .expect("update");
    let stored = fleet
        .db
        .rt
        .block_on(fleet.sensors.find_for_owner(fleet.owner, renamed.id()))
        .expect("find");
    assert_eq!(stored, Some(renamed));
}

#[rstest]
fn latest_for_sensors_picks_newest_reading_per_key(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let fleet = Fleet::create(shared_test_cluster, "reading_latest");
    let owner = fleet.owner;
    fleet.reading(owner, "ESP32_A", 21.0, &clock);
    fleet.reading(owner, "ESP32_B", 5.0, &clock);
    fleet.reading(owner, "ESP32_A", 22.5, &clock);
    fleet.reading(owner, "ESP32_B", 4.0, &clock);
    fleet.reading(UserId::new(), "ESP32_A", 99.0, &clock);
    fleet.reading(owner, "ESP32_C", 30.0, &clock);

    let latest = fleet
        .db
        .rt
        .block_on(
            fleet
                .readings
                .latest_for_sensors(owner, &[key("ESP32_A"), key("ESP32_B"), key("ESP32_Z")]),
        )
        .expect("latest");

    let summary: Vec<(String, f64)> = latest
        .iter()
        .map(|reading| (reading.sensor_key().to_string(), reading.temperature()))
        .collect();
    assert_eq!(
        summary,
        vec![("ESP32_A".to_owned(), 22.5), ("ESP32_B".to_owned(), 4.0)]
    );
}

#[rstest]
fn history_is_oldest_first_and_deleted_per_sensor(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let fleet = Fleet::create(shared_test_cluster, "reading_history");
    let owner = fleet.owner;
    fleet.reading(owner, "ESP32_A", 21.0, &clock);
    fleet.reading(owner, "ESP32_A", 23.0, &clock);
    fleet.reading(owner, "ESP32_B", 5.0, &clock);
    fleet.reading(UserId::new(), "ESP32_A", 99.0, &clock);

    let history = fleet
        .db
        .rt
        .block_on(fleet.readings.list_for_sensor(owner, &key("ESP32_A")))
        .expect("history");
    let temperatures: Vec<f64> = history.iter().map(TemperatureReading::temperature).collect();
    assert_eq!(temperatures, vec![21.0, 23.0]);
    assert!(history.is_sorted_by_key(TemperatureReading::timestamp));

    let removed = fleet
        .db
        .rt
        .block_on(fleet.readings.delete_for_sensor(owner, &key("ESP32_A")))
        .expect("delete");
    assert_eq!(removed, 2);

    let remaining = fleet
        .db
        .rt
        .block_on(fleet.readings.list_for_sensor(owner, &key("ESP32_B")))
        .expect("history");
    assert_eq!(remaining.len(), 1);
}
