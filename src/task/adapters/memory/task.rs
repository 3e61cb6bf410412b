//! In-memory repository for task tests and local use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::project::domain::ProjectId;
use crate::session::domain::UserId;
use crate::task::{
    domain::{StatusChange, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    /// Insertion sequence, used to break creation-time ties.
    order: Vec<TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: &impl fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects matching tasks oldest first.
fn collect_ordered(state: &InMemoryTaskState, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
    let mut tasks: Vec<Task> = state
        .order
        .iter()
        .filter_map(|id| state.tasks.get(id))
        .filter(|task| keep(task))
        .cloned()
        .collect();
    tasks.sort_by_key(Task::created_at);
    tasks
}

fn owned_mut(
    state: &mut InMemoryTaskState,
    owner: UserId,
    id: TaskId,
) -> TaskRepositoryResult<&mut Task> {
    state
        .tasks
        .get_mut(&id)
        .filter(|task| task.owner() == owner)
        .ok_or(TaskRepositoryError::NotFound(id))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_for_project(
        &self,
        owner: UserId,
        project: ProjectId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(collect_ordered(&state, |task| {
            task.owner() == owner && task.project_id() == project
        }))
    }

    async fn list_for_projects(
        &self,
        owner: UserId,
        projects: &[ProjectId],
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(collect_ordered(&state, |task| {
            task.owner() == owner && projects.contains(&task.project_id())
        }))
    }

    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, owner: UserId, task: &Task) -> TaskRepositoryResult<()> {
        if task.owner() != owner {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let stored = owned_mut(&mut state, owner, task.id())?;
        *stored = task.clone();
        Ok(())
    }

    async fn update_status(
        &self,
        owner: UserId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        owned_mut(&mut state, owner, change.task_id)?.apply_status_change(change);
        Ok(())
    }

    async fn delete(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        owned_mut(&mut state, owner, id)?;
        state.tasks.remove(&id);
        state.order.retain(|stored| *stored != id);
        Ok(())
    }
}
