//! Repository port for owner-scoped task storage.

use crate::project::domain::ProjectId;
use crate::session::domain::UserId;
use crate::task::domain::{ParseTaskStatusError, StatusChange, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Reads return tasks in creation order, oldest first, which is the order
/// cards appear within a board column.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns the owner's tasks in one project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::UnknownStatus`] when a stored row has
    /// a status outside the recognised set.
    async fn list_for_project(
        &self,
        owner: UserId,
        project: ProjectId,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the owner's tasks across several projects.
    async fn list_for_projects(
        &self,
        owner: UserId,
        projects: &[ProjectId],
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier is
    /// already taken.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists every editable field of one of the owner's tasks.
    ///
    /// The row is matched by `owner`, never by the owner recorded on `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the owner has no such
    /// task.
    async fn update(&self, owner: UserId, task: &Task) -> TaskRepositoryResult<()>;

    /// Writes a status change: status, `updated_at` and `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the owner has no such
    /// task.
    async fn update_status(
        &self,
        owner: UserId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()>;

    /// Deletes one of the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the owner has no such
    /// task.
    async fn delete(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found for this owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A stored row carries a status outside the recognised set.
    #[error("task {task} has {source}")]
    UnknownStatus {
        /// Offending row.
        task: TaskId,
        /// Parse failure naming the stored value.
        #[source]
        source: ParseTaskStatusError,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
