//! Task repository tests against `PostgreSQL`.

use crate::postgres::helpers::{SteppingClock, TestDatabase, clock};
use chrono::Duration;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskpulse::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{Project, ProjectDraft, ProjectId},
    ports::ProjectRepository,
};
use taskpulse::session::domain::UserId;
use taskpulse::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{Task, TaskDraft, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};

/// Repositories over one database with a project already stored.
struct Board {
    db: TestDatabase,
    projects: PostgresProjectRepository,
    tasks: PostgresTaskRepository,
    owner: UserId,
    project: Project,
}

impl Board {
    fn create(cluster: &'static TestCluster, label: &str, clock: &SteppingClock) -> Self {
        let db = TestDatabase::create(cluster, label);
        let projects = PostgresProjectRepository::new(db.pool.clone());
        let tasks = PostgresTaskRepository::new(db.pool.clone());
        let owner = UserId::new();
        let draft = ProjectDraft::new("Estufa").expect("valid project name");
        let project = Project::create(owner, draft, clock);
        db.rt.block_on(projects.insert(&project)).expect("insert project");
        Self {
            db,
            projects,
            tasks,
            owner,
            project,
        }
    }

    fn task(&self, name: &str, status: TaskStatus, clock: &SteppingClock) -> Task {
        let draft = TaskDraft::new(name)
            .expect("valid task name")
            .with_status(status);
        let task = Task::create(self.owner, self.project.id(), draft, clock);
        clock.advance(Duration::minutes(1));
        self.db.rt.block_on(self.tasks.insert(&task)).expect("insert task");
        task
    }

    fn listed(&self) -> Result<Vec<Task>, TaskRepositoryError> {
        self.db
            .rt
            .block_on(self.tasks.list_for_project(self.owner, self.project.id()))
    }
}

#[rstest]
fn list_for_project_returns_oldest_first(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let board = Board::create(shared_test_cluster, "task_order", &clock);
    let first = board.task("Instalar sensor", TaskStatus::ToDo, &clock);
    let second = board.task("Calibrar sensor", TaskStatus::InProgress, &clock);
    let third = board.task("Validar leituras", TaskStatus::Done, &clock);

    let listed = board.listed().expect("list");

    assert_eq!(listed, vec![first, second, third]);
}

#[rstest]
fn other_owners_see_and_change_nothing(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let board = Board::create(shared_test_cluster, "task_owner", &clock);
    let task = board.task("Instalar sensor", TaskStatus::ToDo, &clock);
    let stranger = UserId::new();

    let listed = board
        .db
        .rt
        .block_on(board.tasks.list_for_project(stranger, board.project.id()))
        .expect("list");
    assert!(listed.is_empty());

    let mut edited = task.clone();
    let draft = TaskDraft::new("Sequestrada").expect("valid task name");
    edited.apply(draft, &clock);
    let updated = board.db.rt.block_on(board.tasks.update(stranger, &edited));
    let deleted = board.db.rt.block_on(board.tasks.delete(stranger, task.id()));

    assert!(matches!(updated, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    assert!(matches!(deleted, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    assert_eq!(board.listed().expect("list"), vec![task]);
}

#[rstest]
fn status_change_sets_and_clears_completion(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let board = Board::create(shared_test_cluster, "task_status", &clock);
    let mut task = board.task("Calibrar sensor", TaskStatus::InProgress, &clock);

    let done = task
        .change_status(TaskStatus::Done, &clock)
        .expect("status differs");
    board
        .db
        .rt
        .block_on(board.tasks.update_status(board.owner, &done))
        .expect("complete");
    assert_eq!(board.listed().expect("list"), vec![task.clone()]);
    assert_eq!(task.completed_at(), Some(done.updated_at));

    clock.advance(Duration::minutes(5));
    let reopened = task
        .change_status(TaskStatus::InReview, &clock)
        .expect("status differs");
    board
        .db
        .rt
        .block_on(board.tasks.update_status(board.owner, &reopened))
        .expect("reopen");

    let listed = board.listed().expect("list");
    assert_eq!(listed, vec![task]);
    assert!(listed.iter().all(|stored| stored.completed_at().is_none()));
}

#[rstest]
fn unrecognised_stored_status_is_reported(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let board = Board::create(shared_test_cluster, "task_unknown_status", &clock);
    let task = board.task("Calibrar sensor", TaskStatus::ToDo, &clock);
    board.db.execute(&format!(
        "UPDATE tasks SET status = 'Arquivado' WHERE id = '{}'",
        task.id()
    ));

    let result = board.listed();

    assert!(
        matches!(
            &result,
            Err(TaskRepositoryError::UnknownStatus { task: id, source })
                if *id == task.id() && source.to_string().contains("Arquivado")
        ),
        "expected UnknownStatus, got: {result:?}"
    );
}

#[rstest]
fn deleting_a_project_removes_its_tasks(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let board = Board::create(shared_test_cluster, "task_cascade", &clock);
    board.task("Instalar sensor", TaskStatus::ToDo, &clock);
    board.task("Validar leituras", TaskStatus::Done, &clock);

    board
        .db
        .rt
        .block_on(board.projects.delete(board.owner, board.project.id()))
        .expect("delete project");

    assert!(board.listed().expect("list").is_empty());
}

#[rstest]
fn task_without_a_stored_project_is_rejected(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let board = Board::create(shared_test_cluster, "task_orphan", &clock);
    let draft = TaskDraft::new("Órfã").expect("valid task name");
    let orphan = Task::create(board.owner, ProjectId::new(), draft, &clock);

    let result = board.db.rt.block_on(board.tasks.insert(&orphan));

    assert!(
        matches!(result, Err(TaskRepositoryError::Persistence(_))),
        "expected a foreign key failure, got: {result:?}"
    );
}
