//! `PostgreSQL` repository implementation for project storage.

use super::{
    models::{NewProjectRow, ProjectChangeset, ProjectRow},
    schema::projects,
};
use crate::project::{
    domain::{PersistedProjectData, Project, ProjectId, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::session::domain::UserId;
use crate::store::{PgPool, StoreError, run_blocking};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, f).await
    }
}

impl From<StoreError> for ProjectRepositoryError {
    fn from(err: StoreError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn list_for_owner(&self, owner: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run(move |connection| {
            let rows = projects::table
                .filter(projects::user_id.eq(owner.into_inner()))
                .order(projects::created_at.desc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> ProjectRepositoryResult<Option<Project>> {
        self.run(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .filter(projects::user_id.eq(owner.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project);
        self.run(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, owner: UserId, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let changes = to_changeset(project);
        self.run(move |connection| {
            let affected = diesel::update(
                projects::table
                    .filter(projects::id.eq(project_id.into_inner()))
                    .filter(projects::user_id.eq(owner.into_inner())),
            )
            .set(&changes)
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, owner: UserId, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run(move |connection| {
            let affected = diesel::delete(
                projects::table
                    .filter(projects::id.eq(id.into_inner()))
                    .filter(projects::user_id.eq(owner.into_inner())),
            )
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        user_id: project.owner().into_inner(),
        name: project.name().to_owned(),
        description: project.description().map(str::to_owned),
        status: project.status().as_str().to_owned(),
        start_date: project.start_date(),
        end_date: project.end_date(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn to_changeset(project: &Project) -> ProjectChangeset {
    ProjectChangeset {
        name: project.name().to_owned(),
        description: project.description().map(str::to_owned),
        status: project.status().as_str().to_owned(),
        start_date: project.start_date(),
        end_date: project.end_date(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let status =
        ProjectStatus::try_from(row.status.as_str()).map_err(ProjectRepositoryError::persistence)?;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        owner: UserId::from_uuid(row.user_id),
        name: row.name,
        description: row.description,
        status,
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
