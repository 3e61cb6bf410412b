//! Then steps for sensor monitoring scenarios.

use super::world::MonitorWorld;
use rstest_bdd_macros::then;
use taskpulse::sensor::domain::Trend;

#[then(r#"the average temperature reads "{expected}""#)]
fn average_reads(world: &MonitorWorld, expected: String) -> Result<(), eyre::Report> {
    let display = world.service()?.stats_display();
    eyre::ensure!(
        display.average == expected,
        "expected average {expected}, found {}",
        display.average
    );
    Ok(())
}

#[then("the visible reading count is {count:usize}")]
fn visible_count(world: &MonitorWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.service()?.visible_readings().len();
    eyre::ensure!(actual == count, "expected {count} visible readings, found {actual}");
    Ok(())
}

#[then(r#"the alerts read "{first}" and "{second}""#)]
fn alerts_read(world: &MonitorWorld, first: String, second: String) -> Result<(), eyre::Report> {
    let messages: Vec<String> = world
        .service()?
        .alerts()
        .iter()
        .map(|alert| alert.message())
        .collect();
    eyre::ensure!(
        messages == [first, second],
        "unexpected alerts: {messages:?}"
    );
    Ok(())
}

#[then("the trend is rising")]
fn trend_rising(world: &MonitorWorld) -> Result<(), eyre::Report> {
    let trend = world.service()?.trend();
    eyre::ensure!(trend == Trend::Rising, "expected a rising trend, found {trend:?}");
    Ok(())
}
