//! Service behind the project list page.

use crate::optimistic::{LocalCollection, MutationController, MutationLabels, Notifier};
use crate::project::{
    domain::{
        Project, ProjectDomainError, ProjectDraft, ProjectId, ProjectProgress, ProjectStatus,
        ProjectSummary,
    },
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::session::domain::UserId;
use crate::session::services::{SessionContext, SessionError};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const LOAD_FAILED: &str = "Erro ao buscar projetos";
const SAVE_FAILED: &str = "Erro ao salvar projeto";
const DELETE_FAILED: &str = "Erro ao excluir projeto";
const SUCCESS: &str = "Sucesso";

/// Request payload for creating or editing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    name: String,
    description: Option<String>,
    status: ProjectStatus,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl ProjectRequest {
    /// Creates a request with the project name and form defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: ProjectStatus::default(),
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status label.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the planned start and end dates.
    #[must_use]
    pub const fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    fn into_draft(self) -> Result<ProjectDraft, ProjectDomainError> {
        let mut draft = ProjectDraft::new(self.name)?
            .with_status(self.status)
            .with_dates(self.start_date, self.end_date);
        if let Some(description) = self.description {
            draft = draft.with_description(description);
        }
        Ok(draft)
    }
}

/// Service-level errors for the project list.
#[derive(Debug, Error)]
pub enum ProjectCatalogError {
    /// Nobody is signed in.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Project storage rejected the operation.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Task storage failed while computing progress.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// The project is not in the list.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
}

/// Result type for project list operations.
pub type ProjectCatalogResult<T> = Result<T, ProjectCatalogError>;

/// Project list with per-project progress.
pub struct ProjectCatalogService<P, T, N, C>
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
    cache: LocalCollection<ProjectSummary>,
}

impl<P, T, N, C> ProjectCatalogService<P, T, N, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates the service; call [`Self::open`] to load the list.
    #[must_use]
    pub fn new(
        projects: Arc<P>,
        tasks: Arc<T>,
        session: SessionContext,
        controller: MutationController<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            projects,
            tasks,
            session,
            controller,
            clock,
            cache: LocalCollection::default(),
        }
    }

    /// Loads the signed-in user's projects, newest first, with progress.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError`] when nobody is signed in or a read
    /// fails; the failure is also reported through the notifier.
    pub async fn open(&self) -> ProjectCatalogResult<Vec<ProjectSummary>> {
        let owner = self.require_user(LOAD_FAILED)?;
        let ticket = self.cache.begin_reload();
        match self.load(owner).await {
            Ok(summaries) => {
                debug!(projects = summaries.len(), "project list loaded");
                self.cache.finish_reload(ticket, summaries.clone());
                Ok(summaries)
            }
            Err(err) => {
                self.cache.abandon_reload(ticket);
                self.controller.reject(LOAD_FAILED, &err);
                Err(err)
            }
        }
    }

    async fn load(&self, owner: UserId) -> ProjectCatalogResult<Vec<ProjectSummary>> {
        let projects = self.projects.list_for_owner(owner).await?;
        let ids: Vec<ProjectId> = projects.iter().map(Project::id).collect();
        let tasks = self.tasks.list_for_projects(owner, &ids).await?;
        Ok(projects
            .into_iter()
            .map(|project| {
                let progress = ProjectProgress::tally(
                    tasks.iter().filter(|task| task.project_id() == project.id()),
                    |task| task.status().is_done(),
                );
                ProjectSummary::new(project, progress)
            })
            .collect())
    }

    /// Returns the cached list.
    #[must_use]
    pub fn projects(&self) -> Vec<ProjectSummary> {
        self.cache.snapshot()
    }

    /// Returns cached projects whose name or description contains `term`,
    /// ignoring case.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<ProjectSummary> {
        self.cache.with_items(|summaries| {
            summaries
                .iter()
                .filter(|summary| summary.project().matches(term))
                .cloned()
                .collect()
        })
    }

    /// Returns the collection backing the list.
    #[must_use]
    pub const fn cache(&self) -> &LocalCollection<ProjectSummary> {
        &self.cache
    }

    /// Creates a project, or edits `editing` when given.
    ///
    /// # Errors
    ///
    /// See [`Self::create`] and [`Self::edit`].
    pub async fn save(
        &self,
        editing: Option<ProjectId>,
        request: ProjectRequest,
    ) -> ProjectCatalogResult<Project> {
        match editing {
            Some(id) => self.edit(id, request).await,
            None => self.create(request).await,
        }
    }

    /// Creates a project and puts it at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Domain`] without any write when the
    /// request is invalid, or [`ProjectCatalogError::Repository`] when the
    /// store rejected the insert.
    pub async fn create(&self, request: ProjectRequest) -> ProjectCatalogResult<Project> {
        let owner = self.require_user(SAVE_FAILED)?;
        let draft = self.validate(request)?;
        let project = Project::create(owner, draft, &*self.clock);

        let summary = ProjectSummary::new(project.clone(), ProjectProgress::default());
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, SAVE_FAILED).with_success_detail("Projeto criado!"),
                move |summaries| summaries.insert(0, summary),
                self.projects.insert(&project),
                || self.load(owner),
            )
            .await
            .into_result()?;
        Ok(project)
    }

    /// Replaces the editable fields of a listed project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Domain`] for invalid input,
    /// [`ProjectCatalogError::NotFound`] when the project is not listed, or
    /// [`ProjectCatalogError::Repository`] when the store rejected the
    /// update.
    pub async fn edit(
        &self,
        id: ProjectId,
        request: ProjectRequest,
    ) -> ProjectCatalogResult<Project> {
        let owner = self.require_user(SAVE_FAILED)?;
        let draft = self.validate(request)?;
        let cached = self.cache.with_items(|summaries| {
            summaries
                .iter()
                .find(|summary| summary.project().id() == id && summary.project().owner() == owner)
                .map(|summary| summary.project().clone())
        });
        let Some(mut project) = cached else {
            let err = ProjectCatalogError::NotFound(id);
            self.controller.reject(SAVE_FAILED, &err);
            return Err(err);
        };
        project.apply(draft, &*self.clock);

        let edited = project.clone();
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, SAVE_FAILED)
                    .with_success_detail("Projeto atualizado!"),
                move |summaries| {
                    if let Some(summary) = summaries
                        .iter_mut()
                        .find(|summary| summary.project().id() == id)
                    {
                        summary.replace_project(edited);
                    }
                },
                self.projects.update(owner, &project),
                || self.load(owner),
            )
            .await
            .into_result()?;
        Ok(project)
    }

    /// Deletes a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Repository`] when the store rejected
    /// the delete; the list has then been reloaded.
    pub async fn delete(&self, id: ProjectId) -> ProjectCatalogResult<()> {
        let owner = self.require_user(DELETE_FAILED)?;
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, DELETE_FAILED)
                    .with_success_detail("Projeto excluído."),
                |summaries| summaries.retain(|summary| summary.project().id() != id),
                self.projects.delete(owner, id),
                || self.load(owner),
            )
            .await
            .into_result()?;
        Ok(())
    }

    /// Refetches the list from the store.
    ///
    /// Returns whether the fetched rows replaced the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Session`] when nobody is signed in.
    pub async fn reload(&self) -> ProjectCatalogResult<bool> {
        let owner = self.session.require_user()?;
        Ok(self
            .controller
            .reconcile(&self.cache, || self.load(owner))
            .await)
    }

    /// Detaches the page; in-flight results arriving later are ignored.
    pub fn unmount(&self) {
        self.cache.detach();
    }

    fn require_user(&self, failure_title: &str) -> ProjectCatalogResult<UserId> {
        self.session.require_user().map_err(|err| {
            self.controller.reject(failure_title, &err);
            ProjectCatalogError::from(err)
        })
    }

    fn validate(&self, request: ProjectRequest) -> ProjectCatalogResult<ProjectDraft> {
        request.into_draft().map_err(|err| {
            self.controller.reject(SAVE_FAILED, &err);
            ProjectCatalogError::from(err)
        })
    }
}
