//! When steps for sensor monitoring scenarios.

use super::world::{MonitorWorld, parse_temperature, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskpulse::sensor::domain::TimeRange;

#[when("the monitor page is opened")]
fn monitor_opened(world: &mut MonitorWorld) -> Result<(), eyre::Report> {
    let service = world.mount()?;
    run_async(service.open())
        .map_err(|redirect| eyre::eyre!("monitor failed to open: {redirect:?}"))?;
    Ok(())
}

#[when(r#"the time range "{key}" is selected"#)]
fn range_selected(world: &mut MonitorWorld, key: String) -> Result<(), eyre::Report> {
    let range = TimeRange::try_from(key.as_str())
        .map_err(|err| eyre::eyre!("invalid time range in scenario: {err}"))?;
    world.service()?.set_time_range(range);
    Ok(())
}

#[when(r#"a reading of "{temperature}" degrees is recorded"#)]
fn reading_recorded(world: &mut MonitorWorld, temperature: String) -> Result<(), eyre::Report> {
    let value = parse_temperature(&temperature)?;
    run_async(world.service()?.record_reading(value)).wrap_err("record reading")?;
    Ok(())
}
