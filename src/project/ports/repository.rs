//! Repository port for owner-scoped project storage.

use crate::project::domain::{Project, ProjectId};
use crate::session::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
///
/// Every operation is scoped to an owner; rows belonging to another user are
/// reported as missing.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Returns the owner's projects, newest first.
    async fn list_for_owner(&self, owner: UserId) -> ProjectRepositoryResult<Vec<Project>>;

    /// Finds one of the owner's projects.
    ///
    /// Returns `None` when the project does not exist or belongs to someone
    /// else.
    async fn find_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> ProjectRepositoryResult<Option<Project>>;

    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the
    /// identifier is already taken.
    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists the editable fields and `updated_at` of one of the owner's
    /// projects, matched by `owner` rather than by `project.owner()`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the owner has no
    /// such project.
    async fn update(&self, owner: UserId, project: &Project) -> ProjectRepositoryResult<()>;

    /// Deletes one of the owner's projects.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the owner has no
    /// such project.
    async fn delete(&self, owner: UserId, id: ProjectId) -> ProjectRepositoryResult<()>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found for this owner.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
