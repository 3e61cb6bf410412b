//! Domain model for projects.

mod error;
mod ids;
mod progress;
mod project;

pub use error::{ParseProjectStatusError, ProjectDomainError};
pub use ids::ProjectId;
pub use progress::ProjectProgress;
pub use project::{PersistedProjectData, Project, ProjectDraft, ProjectStatus, ProjectSummary};
