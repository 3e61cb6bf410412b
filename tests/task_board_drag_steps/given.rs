//! Given steps for task board drag scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use taskpulse::project::{
    domain::{Project, ProjectDraft},
    ports::ProjectRepository,
};
use taskpulse::task::{domain::TaskStatus, services::TaskRequest};

#[given(r#"a signed-in user with a project "{name}""#)]
fn signed_in_with_project(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    let project = Project::create(world.owner, ProjectDraft::new(name)?, &DefaultClock);
    run_async(world.projects.insert(&project)).wrap_err("store scenario project")?;
    world.mount(project.id());
    run_async(world.service()?.open())
        .map_err(|redirect| eyre::eyre!("board failed to open: {redirect:?}"))?;
    Ok(())
}

#[given(r#"a task "{name}" in "{status}""#)]
fn task_in_status(
    world: &mut BoardWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let status = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let request = TaskRequest::new(name.clone()).with_status(status);
    let task = run_async(world.service()?.create_task(request)).wrap_err("create scenario task")?;
    world.task_ids.insert(name, task.id());
    Ok(())
}
