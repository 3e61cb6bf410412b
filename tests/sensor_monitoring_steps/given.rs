//! Given steps for sensor monitoring scenarios.

use super::world::{MonitorWorld, parse_temperature, run_async};
use chrono::Duration;
use eyre::WrapErr;
use mockable::{Clock, DefaultClock};
use rstest_bdd_macros::given;
use taskpulse::sensor::{
    domain::{Sensor, SensorDraft, TemperatureReading},
    ports::{ReadingRepository, SensorRepository},
};

#[given(r#"a sensor "{key}" named "{name}""#)]
fn registered_sensor(
    world: &mut MonitorWorld,
    key: String,
    name: String,
) -> Result<(), eyre::Report> {
    let sensor = Sensor::create(world.owner, SensorDraft::new(key, name)?, &DefaultClock);
    run_async(world.sensors.insert(&sensor)).wrap_err("store scenario sensor")?;
    world.sensor = Some(sensor);
    Ok(())
}

#[given(r#"a reading of "{temperature}" degrees taken {amount:i64} {unit} ago"#)]
fn past_reading(
    world: &mut MonitorWorld,
    temperature: String,
    amount: i64,
    unit: String,
) -> Result<(), eyre::Report> {
    let age = match unit.as_str() {
        "days" => Duration::days(amount),
        "hours" => Duration::hours(amount),
        "minutes" => Duration::minutes(amount),
        other => eyre::bail!("unsupported time unit {other}"),
    };
    let key = world.sensor()?.key().clone();
    let reading = TemperatureReading::new(
        world.owner,
        key,
        parse_temperature(&temperature)?,
        DefaultClock.utc() - age,
    )?;
    run_async(world.readings.insert(&reading)).wrap_err("store scenario reading")?;
    Ok(())
}
