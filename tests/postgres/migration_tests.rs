//! Schema migration tests.

use crate::postgres::helpers::{MIGRATION_DOWN_SQL, MIGRATION_UP_SQL, TestDatabase};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskpulse::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{ProjectId, ProjectStatus},
    ports::ProjectRepository,
};
use taskpulse::session::domain::UserId;
use taskpulse::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{TaskPriority, TaskStatus},
    ports::TaskRepository,
};

#[rstest]
fn down_then_up_recreates_the_schema(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster, "migration_cycle");

    db.execute(MIGRATION_DOWN_SQL);
    db.execute(MIGRATION_UP_SQL);

    let repo = PostgresProjectRepository::new(db.pool.clone());
    let listed = db
        .rt
        .block_on(repo.list_for_owner(UserId::new()))
        .expect("list after re-migration");
    assert!(listed.is_empty());
}

#[rstest]
fn column_defaults_read_back_as_initial_statuses(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster, "migration_defaults");
    let owner = UserId::new();
    let project = ProjectId::new();
    db.execute(&format!(
        "INSERT INTO projects (id, user_id, name) VALUES ('{project}', '{owner}', 'Estufa');
         INSERT INTO tasks (id, project_id, user_id, name)
         VALUES (gen_random_uuid(), '{project}', '{owner}', 'Instalar sensor');"
    ));

    let projects = PostgresProjectRepository::new(db.pool.clone());
    let tasks = PostgresTaskRepository::new(db.pool.clone());
    let stored_project = db
        .rt
        .block_on(projects.find_for_owner(owner, project))
        .expect("find project")
        .expect("project stored");
    let stored_tasks = db
        .rt
        .block_on(tasks.list_for_project(owner, project))
        .expect("list tasks");

    assert_eq!(stored_project.status(), ProjectStatus::NotStarted);
    let [task] = stored_tasks.as_slice() else {
        panic!("expected one task, got {}", stored_tasks.len());
    };
    assert_eq!(task.status(), TaskStatus::ToDo);
    assert_eq!(task.priority(), TaskPriority::Medium);
    assert!(task.completed_at().is_none());
}
