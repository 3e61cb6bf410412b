//! Then steps for task board drag scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::then;
use taskpulse::task::{domain::TaskStatus, ports::TaskRepository};

fn parse_status(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

#[then(r#"the task "{name}" is in "{status}""#)]
fn task_is_in(world: &BoardWorld, name: String, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let id = world.task_id(&name)?;
    let located = world.service()?.board().locate(id).map(|(column, _)| column);
    eyre::ensure!(
        located == Some(expected),
        "expected {name} in {expected}, found {located:?}"
    );
    Ok(())
}

#[then(r#"the stored task "{name}" is in "{status}""#)]
fn stored_task_is_in(world: &BoardWorld, name: String, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let id = world.task_id(&name)?;
    let project = world
        .service()?
        .project()
        .ok_or_else(|| eyre::eyre!("board has no project"))?;
    let stored = run_async(world.tasks.list_for_project(world.owner, project.id()))?;
    let task = stored
        .iter()
        .find(|task| task.id() == id)
        .ok_or_else(|| eyre::eyre!("task {name} is not stored"))?;
    eyre::ensure!(
        task.status() == expected,
        "expected stored {name} in {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task "{name}" has a completion time"#)]
fn has_completion_time(world: &BoardWorld, name: String) -> Result<(), eyre::Report> {
    let task = world.cached_task(&name)?;
    eyre::ensure!(task.completed_at().is_some(), "{name} has no completion time");
    Ok(())
}

#[then(r#"the task "{name}" has no completion time"#)]
fn has_no_completion_time(world: &BoardWorld, name: String) -> Result<(), eyre::Report> {
    let task = world.cached_task(&name)?;
    eyre::ensure!(task.completed_at().is_none(), "{name} still has a completion time");
    Ok(())
}

#[then("no status change is written")]
fn no_status_change(world: &BoardWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(world.last_change, Some(None)),
        "expected a no-op drag, got {:?}",
        world.last_change
    );
    eyre::ensure!(
        world.notifier.recorded().is_empty(),
        "a no-op drag must not notify"
    );
    Ok(())
}

#[then("the project progress is {percent:u64} percent")]
fn progress_is(world: &BoardWorld, percent: u64) -> Result<(), eyre::Report> {
    let actual = u64::from(world.service()?.progress().percent());
    eyre::ensure!(actual == percent, "expected {percent}% progress, found {actual}%");
    Ok(())
}
