//! Shared world state for task board drag scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use taskpulse::optimistic::{MutationController, RecordingNotifier};
use taskpulse::project::adapters::memory::InMemoryProjectRepository;
use taskpulse::session::{
    domain::{AuthEvent, AuthenticatedUser, Session, UserId},
    services::SessionContext,
};
use taskpulse::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{StatusChange, Task, TaskId},
    services::TaskBoardService,
};

/// Board service type used by the BDD world.
pub type TestBoardService = TaskBoardService<
    InMemoryProjectRepository,
    InMemoryTaskRepository,
    RecordingNotifier,
    DefaultClock,
>;

/// Scenario world for drag behaviour tests.
pub struct BoardWorld {
    pub owner: UserId,
    pub session: SessionContext,
    pub projects: Arc<InMemoryProjectRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: Option<TestBoardService>,
    pub task_ids: HashMap<String, TaskId>,
    pub last_change: Option<Option<StatusChange>>,
}

impl BoardWorld {
    /// Creates a world with a signed-in user and empty stores.
    #[must_use]
    pub fn new() -> Self {
        let owner = UserId::new();
        let session = SessionContext::new();
        let user = AuthenticatedUser::new(owner, "ana@example.com");
        let expires_at = DefaultClock.utc() + Duration::hours(1);
        session.apply(&AuthEvent::SignedIn(Session::new(user, "token", expires_at)));
        Self {
            owner,
            session,
            projects: Arc::new(InMemoryProjectRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            service: None,
            task_ids: HashMap::new(),
            last_change: None,
        }
    }

    /// Returns the mounted board service.
    pub fn service(&self) -> Result<&TestBoardService, eyre::Report> {
        self.service
            .as_ref()
            .ok_or_else(|| eyre::eyre!("board has not been opened in this scenario"))
    }

    /// Returns the identifier of a task created under `name`.
    pub fn task_id(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.task_ids
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task named {name} in scenario world"))
    }

    /// Returns the cached task created under `name`.
    pub fn cached_task(&self, name: &str) -> Result<Task, eyre::Report> {
        let id = self.task_id(name)?;
        self.service()?
            .tasks()
            .into_iter()
            .find(|task| task.id() == id)
            .ok_or_else(|| eyre::eyre!("task {name} is not on the board"))
    }

    /// Builds a board service for `project`.
    pub fn mount(&mut self, project: taskpulse::project::domain::ProjectId) {
        self.service = Some(TaskBoardService::new(
            Arc::clone(&self.projects),
            Arc::clone(&self.tasks),
            self.session.clone(),
            MutationController::new(Arc::clone(&self.notifier)),
            Arc::new(DefaultClock),
            project,
        ));
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
