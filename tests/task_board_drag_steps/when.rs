//! When steps for task board drag scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskpulse::task::domain::DragEnd;

fn release(world: &mut BoardWorld, drag: &DragEnd) -> Result<(), eyre::Report> {
    world.notifier.drain();
    let change = run_async(world.service()?.handle_drag_end(drag)).wrap_err("handle drag end")?;
    world.last_change = Some(change);
    Ok(())
}

#[when(r#"the task "{name}" is dropped on the column "{column}""#)]
fn dropped_on_column(
    world: &mut BoardWorld,
    name: String,
    column: String,
) -> Result<(), eyre::Report> {
    let drag = DragEnd::onto(world.task_id(&name)?, column);
    release(world, &drag)
}

#[when(r#"the task "{name}" is dropped on the task "{target}""#)]
fn dropped_on_task(
    world: &mut BoardWorld,
    name: String,
    target: String,
) -> Result<(), eyre::Report> {
    let drag = DragEnd::onto(world.task_id(&name)?, world.task_id(&target)?.to_string());
    release(world, &drag)
}

#[when(r#"the task "{name}" is dropped outside the board"#)]
fn dropped_outside(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    let drag = DragEnd::outside(world.task_id(&name)?);
    release(world, &drag)
}
