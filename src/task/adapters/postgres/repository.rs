//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, StatusChangeset, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::project::domain::ProjectId;
use crate::session::domain::UserId;
use crate::store::{PgPool, StoreError, run_blocking};
use crate::task::{
    domain::{PersistedTaskData, StatusChange, Task, TaskId, TaskPriority, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, f).await
    }
}

impl From<StoreError> for TaskRepositoryError {
    fn from(err: StoreError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list_for_project(
        &self,
        owner: UserId,
        project: ProjectId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run(move |connection| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(owner.into_inner()))
                .filter(tasks::project_id.eq(project.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_for_projects(
        &self,
        owner: UserId,
        projects: &[ProjectId],
    ) -> TaskRepositoryResult<Vec<Task>> {
        let project_ids: Vec<uuid::Uuid> =
            projects.iter().map(|project| project.into_inner()).collect();
        self.run(move |connection| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(owner.into_inner()))
                .filter(tasks::project_id.eq_any(project_ids))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);
        self.run(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, owner: UserId, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changes = to_changeset(task);
        self.run(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::user_id.eq(owner.into_inner())),
            )
            .set(&changes)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            ensure_affected(affected, task_id)
        })
        .await
    }

    async fn update_status(
        &self,
        owner: UserId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()> {
        let task_id = change.task_id;
        let changes = StatusChangeset {
            status: change.status.as_str().to_owned(),
            completed_at: change.completed_at,
            updated_at: change.updated_at,
        };
        self.run(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::user_id.eq(owner.into_inner())),
            )
            .set(&changes)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            ensure_affected(affected, task_id)
        })
        .await
    }

    async fn delete(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<()> {
        self.run(move |connection| {
            let affected = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::user_id.eq(owner.into_inner())),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            ensure_affected(affected, id)
        })
        .await
    }
}

const fn ensure_affected(affected: usize, id: TaskId) -> TaskRepositoryResult<()> {
    if affected == 0 {
        return Err(TaskRepositoryError::NotFound(id));
    }
    Ok(())
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        user_id: task.owner().into_inner(),
        name: task.name().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        assigned_to_name: task.assigned_to_name().map(str::to_owned),
        completed_at: task.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        name: task.name().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        assigned_to_name: task.assigned_to_name().map(str::to_owned),
        completed_at: task.completed_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        user_id,
        name,
        description,
        status: persisted_status,
        priority: persisted_priority,
        due_date,
        assigned_to_name,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let task_id = TaskId::from_uuid(id);
    let status = TaskStatus::try_from(persisted_status.as_str()).map_err(|source| {
        TaskRepositoryError::UnknownStatus {
            task: task_id,
            source,
        }
    })?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: task_id,
        project_id: ProjectId::from_uuid(project_id),
        owner: UserId::from_uuid(user_id),
        name,
        description,
        status,
        priority,
        due_date,
        assigned_to_name,
        completed_at,
        created_at,
        updated_at,
    }))
}
