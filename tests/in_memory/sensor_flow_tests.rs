//! In-memory integration tests for the sensor list and monitor pages.

use std::sync::Arc;

use super::helpers::{Stores, stores};
use mockable::DefaultClock;
use rstest::rstest;
use taskpulse::navigation::Route;
use taskpulse::optimistic::RecordingNotifier;
use taskpulse::sensor::{
    adapters::memory::{InMemoryReadingRepository, InMemorySensorRepository},
    domain::{AlertPolicy, SensorId},
    ports::ReadingRepository,
    services::{SensorFleetService, SensorMonitorService, SensorRequest},
};

type Fleet = SensorFleetService<
    InMemorySensorRepository,
    InMemoryReadingRepository,
    RecordingNotifier,
    DefaultClock,
>;
type Monitor = SensorMonitorService<
    InMemorySensorRepository,
    InMemoryReadingRepository,
    RecordingNotifier,
    DefaultClock,
>;

fn fleet(stores: &Stores) -> Fleet {
    SensorFleetService::new(
        Arc::clone(&stores.sensors),
        Arc::clone(&stores.readings),
        stores.session.clone(),
        stores.controller(),
        Arc::clone(&stores.clock),
    )
}

fn monitor(stores: &Stores, sensor: SensorId) -> Monitor {
    SensorMonitorService::new(
        Arc::clone(&stores.sensors),
        Arc::clone(&stores.readings),
        stores.session.clone(),
        stores.controller(),
        Arc::clone(&stores.clock),
        sensor,
        AlertPolicy::default(),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recorded_reading_becomes_the_fleet_latest(stores: Stores) -> Result<(), eyre::Report> {
    stores.sign_in().await?;
    let sensors = fleet(&stores);
    sensors.open().await?;
    let sensor = sensors
        .create(SensorRequest::with_generated_key("Estufa"))
        .await?;
    assert!(sensor.key().as_str().starts_with("ESP32_"));

    let page = monitor(&stores, sensor.id());
    page.open()
        .await
        .map_err(|redirect| eyre::eyre!("monitor redirected: {redirect:?}"))?;
    let recorded = page.record_reading(23.0).await?;
    assert_eq!(page.readings(), vec![recorded.clone()]);

    assert!(sensors.reload().await?);
    let listed = sensors.sensors();
    let summary = listed
        .first()
        .ok_or_else(|| eyre::eyre!("fleet should list the sensor"))?;
    assert_eq!(summary.latest(), Some(&recorded));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_sensor_closes_its_monitor(stores: Stores) -> Result<(), eyre::Report> {
    stores.sign_in().await?;
    let owner = stores
        .session
        .current_user()
        .ok_or_else(|| eyre::eyre!("expected a signed-in user"))?
        .id();
    let sensors = fleet(&stores);
    sensors.open().await?;
    let sensor = sensors
        .create(SensorRequest::new("ESP32_SALA", "Sala"))
        .await?;
    let page = monitor(&stores, sensor.id());
    page.open()
        .await
        .map_err(|redirect| eyre::eyre!("monitor redirected: {redirect:?}"))?;
    page.record_reading(19.0).await?;

    sensors.delete(sensor.id()).await?;
    page.unmount();

    let remaining = stores.readings.list_for_sensor(owner, sensor.key()).await?;
    assert!(remaining.is_empty(), "readings outlived their sensor");
    let redirect = monitor(&stores, sensor.id())
        .open()
        .await
        .expect_err("deleted sensor must not open");
    assert_eq!(redirect.to(), Route::Sensors);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sensor_keys_are_scoped_per_owner(stores: Stores) -> Result<(), eyre::Report> {
    stores.sign_in_as("ana@example.com").await?;
    fleet(&stores)
        .create(SensorRequest::new("ESP32_SALA", "Sala"))
        .await?;
    stores.sessions().logout().await?;

    stores.sign_in_as("bruno@example.com").await?;
    let sensors = fleet(&stores);
    assert!(sensors.open().await?.is_empty());
    let own = sensors
        .create(SensorRequest::new("ESP32_SALA", "Sala do Bruno"))
        .await?;
    assert_eq!(own.key().as_str(), "ESP32_SALA");
    assert_eq!(sensors.sensors().len(), 1);
    Ok(())
}
