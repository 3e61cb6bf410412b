//! In-memory repository for project tests and local use.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::session::domain::UserId;

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: &impl fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list_for_owner(&self, owner: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut projects: Vec<Project> = state
            .values()
            .filter(|project| project.owner() == owner)
            .cloned()
            .collect();
        projects.sort_by_key(|project| Reverse(project.created_at()));
        Ok(projects)
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state
            .get(&id)
            .filter(|project| project.owner() == owner)
            .cloned())
    }

    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        if state.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, owner: UserId, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let stored = state
            .get_mut(&project.id())
            .filter(|stored| stored.owner() == owner && project.owner() == owner)
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        *stored = project.clone();
        Ok(())
    }

    async fn delete(&self, owner: UserId, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        match state.get(&id) {
            Some(project) if project.owner() == owner => {
                state.remove(&id);
                Ok(())
            }
            _ => Err(ProjectRepositoryError::NotFound(id)),
        }
    }
}
