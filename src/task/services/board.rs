//! Service behind one mounted project board page.

use crate::navigation::{Redirect, Route};
use crate::optimistic::{LocalCollection, MutationController, MutationLabels, Notifier};
use crate::project::{
    domain::{Project, ProjectId, ProjectProgress},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::session::domain::UserId;
use crate::session::services::{SessionContext, SessionError};
use crate::task::{
    domain::{
        DragEnd, DragResolution, StatusBoard, StatusChange, Task, TaskDomainError, TaskDraft,
        TaskId, TaskPriority, TaskStatus, resolve_drag,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

const LOAD_FAILED: &str = "Erro ao buscar detalhes do projeto";
const SAVE_FAILED: &str = "Erro ao salvar tarefa";
const DELETE_FAILED: &str = "Erro ao excluir tarefa";
const STATUS_FAILED: &str = "Erro ao atualizar status";
const SUCCESS: &str = "Sucesso";

/// Request payload for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    name: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assigned_to_name: Option<String>,
}

impl TaskRequest {
    /// Creates a request with the task name and form defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: TaskStatus::ToDo,
            priority: TaskPriority::default(),
            due_date: None,
            assigned_to_name: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the assignee display name.
    #[must_use]
    pub fn with_assignee(mut self, name: impl Into<String>) -> Self {
        self.assigned_to_name = Some(name.into());
        self
    }

    fn into_draft(self) -> Result<TaskDraft, TaskDomainError> {
        let mut draft = TaskDraft::new(self.name)?
            .with_status(self.status)
            .with_priority(self.priority)
            .with_due_date(self.due_date);
        if let Some(description) = self.description {
            draft = draft.with_description(description);
        }
        if let Some(assignee) = self.assigned_to_name {
            draft = draft.with_assignee(assignee);
        }
        Ok(draft)
    }
}

/// Service-level errors for the task board.
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// Nobody is signed in.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task storage rejected the operation.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Project storage rejected the operation.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),
    /// The project does not exist or belongs to someone else.
    #[error("project not found or access denied: {0}")]
    ProjectNotFound(ProjectId),
    /// The task is not on this board.
    #[error("task not found on this board: {0}")]
    TaskNotFound(TaskId),
}

/// Result type for task board operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;

/// Task board for one project.
///
/// Cards are cached in a [`LocalCollection`]; the [`StatusBoard`] is derived
/// from that cache on every read, so optimistic changes show up before the
/// remote write resolves.
pub struct TaskBoardService<P, T, N, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    session: SessionContext,
    controller: MutationController<N>,
    clock: Arc<C>,
    project_id: ProjectId,
    project: Arc<RwLock<Option<Project>>>,
    cache: LocalCollection<Task>,
}

impl<P, T, N, C> TaskBoardService<P, T, N, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates the board for `project_id`; call [`Self::open`] to load it.
    #[must_use]
    pub fn new(
        projects: Arc<P>,
        tasks: Arc<T>,
        session: SessionContext,
        controller: MutationController<N>,
        clock: Arc<C>,
        project_id: ProjectId,
    ) -> Self {
        Self {
            projects,
            tasks,
            session,
            controller,
            clock,
            project_id,
            project: Arc::new(RwLock::new(None)),
            cache: LocalCollection::default(),
        }
    }

    /// Loads the project and its tasks.
    ///
    /// # Errors
    ///
    /// Returns a [`Redirect`] to the sign-in page when nobody is signed in,
    /// or to the project list when the project cannot be read. The failure
    /// is reported through the notifier first.
    pub async fn open(&self) -> Result<StatusBoard, Redirect> {
        let owner = self.session.require_user().map_err(|err| {
            self.controller.reject(LOAD_FAILED, &err);
            Redirect::new(Route::Login, err.to_string())
        })?;

        let ticket = self.cache.begin_reload();
        match self.load(owner).await {
            Ok((project, tasks)) => {
                debug!(project = %self.project_id, tasks = tasks.len(), "task board loaded");
                *self.project.write().unwrap_or_else(PoisonError::into_inner) = Some(project);
                self.cache.finish_reload(ticket, tasks);
                Ok(self.board())
            }
            Err(err) => {
                self.cache.abandon_reload(ticket);
                warn!(project = %self.project_id, error = %err, "task board failed to load");
                self.controller.reject(LOAD_FAILED, &err);
                Err(Redirect::new(Route::Projects, err.to_string()))
            }
        }
    }

    async fn load(&self, owner: UserId) -> TaskBoardResult<(Project, Vec<Task>)> {
        let project = self
            .projects
            .find_for_owner(owner, self.project_id)
            .await?
            .ok_or(TaskBoardError::ProjectNotFound(self.project_id))?;
        let tasks = self.tasks.list_for_project(owner, self.project_id).await?;
        Ok((project, tasks))
    }

    async fn load_tasks(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.tasks.list_for_project(owner, self.project_id).await
    }

    /// Returns the project loaded by [`Self::open`].
    #[must_use]
    pub fn project(&self) -> Option<Project> {
        self.project
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the cached tasks in fetch order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.cache.snapshot()
    }

    /// Returns the board derived from the cached tasks.
    #[must_use]
    pub fn board(&self) -> StatusBoard {
        self.cache.with_items(|tasks| StatusBoard::from_tasks(tasks))
    }

    /// Returns the project's completion progress from the cached tasks.
    #[must_use]
    pub fn progress(&self) -> ProjectProgress {
        self.cache
            .with_items(|tasks| ProjectProgress::tally(tasks, |task| task.status().is_done()))
    }

    /// Returns the collection backing the board.
    #[must_use]
    pub const fn cache(&self) -> &LocalCollection<Task> {
        &self.cache
    }

    /// Handles the end of a card drag.
    ///
    /// Resolves the target status and applies it through
    /// [`Self::apply_status_change`]. Returns `Ok(None)` when the drag is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// See [`Self::apply_status_change`].
    pub async fn handle_drag_end(
        &self,
        drag: &DragEnd,
    ) -> TaskBoardResult<Option<StatusChange>> {
        let resolution = self.cache.with_items(|tasks| resolve_drag(tasks, drag));
        match resolution {
            DragResolution::Resolved {
                task_id, status, ..
            } => self.apply_status_change(task_id, status).await,
            DragResolution::NoOp(reason) => {
                debug!(active = drag.active_id(), ?reason, "drag ignored");
                Ok(None)
            }
        }
    }

    /// Moves a task to `status`, optimistically.
    ///
    /// The cached task changes immediately; the remote row is then updated
    /// with the same status, `updated_at` and `completed_at`. Returns
    /// `Ok(None)` without any write when the signed-in user has no such
    /// cached task or it already has `status`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Session`] when nobody is signed in, or
    /// [`TaskBoardError::Repository`] when the store rejected the write. In
    /// the latter case the cache has been reloaded from the store.
    pub async fn apply_status_change(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TaskBoardResult<Option<StatusChange>> {
        let owner = self.require_user(STATUS_FAILED)?;
        let now = self.clock.utc();
        let planned = self.cache.with_items(|tasks| {
            tasks
                .iter()
                .find(|task| task.id() == task_id && task.owner() == owner)
                .and_then(|task| task.plan_status_change(status, now))
        });
        let Some(change) = planned else {
            return Ok(None);
        };

        let labels = MutationLabels::new("Status da Tarefa Atualizado", STATUS_FAILED)
            .with_success_detail(format!("Tarefa movida para {status}."));
        self.controller
            .run(
                &self.cache,
                labels,
                |tasks| {
                    if let Some(task) = tasks.iter_mut().find(|task| task.id() == task_id) {
                        task.apply_status_change(&change);
                    }
                },
                self.tasks.update_status(owner, &change),
                || self.load_tasks(owner),
            )
            .await
            .into_result()?;
        Ok(Some(change))
    }

    /// Creates a task on this board.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Domain`] without any write when the request
    /// is invalid, or [`TaskBoardError::Repository`] when the store rejected
    /// the insert.
    pub async fn create_task(&self, request: TaskRequest) -> TaskBoardResult<Task> {
        let owner = self.require_user(SAVE_FAILED)?;
        let draft = self.validate(request)?;
        let task = Task::create(owner, self.project_id, draft, &*self.clock);

        let created = task.clone();
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, SAVE_FAILED).with_success_detail("Tarefa criada!"),
                move |tasks| tasks.push(created),
                self.tasks.insert(&task),
                || self.load_tasks(owner),
            )
            .await
            .into_result()?;
        Ok(task)
    }

    /// Replaces the editable fields of a cached task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Domain`] for invalid input,
    /// [`TaskBoardError::TaskNotFound`] when the task is not on this board,
    /// or [`TaskBoardError::Repository`] when the store rejected the update.
    pub async fn edit_task(
        &self,
        task_id: TaskId,
        request: TaskRequest,
    ) -> TaskBoardResult<Task> {
        let owner = self.require_user(SAVE_FAILED)?;
        let draft = self.validate(request)?;
        let Some(mut task) = self.cached(owner, task_id) else {
            let err = TaskBoardError::TaskNotFound(task_id);
            self.controller.reject(SAVE_FAILED, &err);
            return Err(err);
        };
        task.apply(draft, &*self.clock);

        let edited = task.clone();
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, SAVE_FAILED)
                    .with_success_detail("Tarefa atualizada!"),
                move |tasks| {
                    if let Some(slot) = tasks.iter_mut().find(|slot| slot.id() == task_id) {
                        *slot = edited;
                    }
                },
                self.tasks.update(owner, &task),
                || self.load_tasks(owner),
            )
            .await
            .into_result()?;
        Ok(task)
    }

    /// Deletes a task from this board.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the store rejected the
    /// delete; the cache has then been reloaded.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskBoardResult<()> {
        let owner = self.require_user(DELETE_FAILED)?;
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, DELETE_FAILED)
                    .with_success_detail("Tarefa excluída."),
                |tasks| tasks.retain(|task| task.id() != task_id),
                self.tasks.delete(owner, task_id),
                || self.load_tasks(owner),
            )
            .await
            .into_result()?;
        Ok(())
    }

    /// Refetches the board's tasks from the store.
    ///
    /// Returns whether the fetched rows replaced the cache.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Session`] when nobody is signed in.
    pub async fn reload(&self) -> TaskBoardResult<bool> {
        let owner = self.session.require_user()?;
        Ok(self
            .controller
            .reconcile(&self.cache, || self.load_tasks(owner))
            .await)
    }

    /// Detaches the page; in-flight results arriving later are ignored.
    pub fn unmount(&self) {
        self.cache.detach();
    }

    fn cached(&self, owner: UserId, task_id: TaskId) -> Option<Task> {
        self.cache.with_items(|tasks| {
            tasks
                .iter()
                .find(|task| task.id() == task_id && task.owner() == owner)
                .cloned()
        })
    }

    fn require_user(&self, failure_title: &str) -> TaskBoardResult<UserId> {
        self.session.require_user().map_err(|err| {
            self.controller.reject(failure_title, &err);
            TaskBoardError::from(err)
        })
    }

    fn validate(&self, request: TaskRequest) -> TaskBoardResult<TaskDraft> {
        request.into_draft().map_err(|err| {
            self.controller.reject(SAVE_FAILED, &err);
            TaskBoardError::from(err)
        })
    }
}
