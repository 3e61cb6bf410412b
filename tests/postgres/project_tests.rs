//! Project repository tests against `PostgreSQL`.

use crate::postgres::helpers::{SteppingClock, TestDatabase, clock};
use chrono::Duration;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskpulse::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{Project, ProjectDraft, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use taskpulse::session::domain::UserId;

fn project(owner: UserId, name: &str, clock: &SteppingClock) -> Project {
    let draft = ProjectDraft::new(name).expect("valid project name");
    let project = Project::create(owner, draft, clock);
    clock.advance(Duration::minutes(1));
    project
}

#[rstest]
fn list_for_owner_returns_newest_first(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db = TestDatabase::create(shared_test_cluster, "project_order");
    let repo = PostgresProjectRepository::new(db.pool.clone());
    let owner = UserId::new();
    let older = project(owner, "Estufa", &clock);
    let newer = project(owner, "Câmara fria", &clock);

    db.rt.block_on(repo.insert(&older)).expect("insert older");
    db.rt.block_on(repo.insert(&newer)).expect("insert newer");

    let listed = db.rt.block_on(repo.list_for_owner(owner)).expect("list");
    assert_eq!(listed, vec![newer, older]);
}

#[rstest]
fn reads_and_writes_are_scoped_to_the_owner(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db = TestDatabase::create(shared_test_cluster, "project_owner");
    let repo = PostgresProjectRepository::new(db.pool.clone());
    let owner = UserId::new();
    let stranger = UserId::new();
    let mut stored = project(owner, "Estufa", &clock);
    db.rt.block_on(repo.insert(&stored)).expect("insert");

    let listed = db.rt.block_on(repo.list_for_owner(stranger)).expect("list");
    let found = db
        .rt
        .block_on(repo.find_for_owner(stranger, stored.id()))
        .expect("find");
    assert!(listed.is_empty());
    assert!(found.is_none());

    let original = stored.clone();
    let draft = ProjectDraft::new("Sequestrado").expect("valid project name");
    stored.apply(draft, &clock);
    let updated = db.rt.block_on(repo.update(stranger, &stored));
    let deleted = db.rt.block_on(repo.delete(stranger, stored.id()));
    assert!(matches!(updated, Err(ProjectRepositoryError::NotFound(id)) if id == stored.id()));
    assert!(matches!(deleted, Err(ProjectRepositoryError::NotFound(id)) if id == stored.id()));

    let kept = db
        .rt
        .block_on(repo.find_for_owner(owner, stored.id()))
        .expect("find");
    assert_eq!(kept, Some(original));
}

#[rstest]
fn update_persists_editable_fields(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db = TestDatabase::create(shared_test_cluster, "project_update");
    let repo = PostgresProjectRepository::new(db.pool.clone());
    let owner = UserId::new();
    let mut stored = project(owner, "Estufa", &clock);
    db.rt.block_on(repo.insert(&stored)).expect("insert");

    let draft = ProjectDraft::new("Estufa norte")
        .expect("valid project name")
        .with_description("Sensores do lado norte")
        .with_status(ProjectStatus::InProgress);
    stored.apply(draft, &clock);
    db.rt
        .block_on(repo.update(owner, &stored))
        .expect("update");

    let found = db
        .rt
        .block_on(repo.find_for_owner(owner, stored.id()))
        .expect("find");
    assert_eq!(found, Some(stored));
}

#[rstest]
fn duplicate_identifier_is_reported(
    clock: SteppingClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db = TestDatabase::create(shared_test_cluster, "project_duplicate");
    let repo = PostgresProjectRepository::new(db.pool.clone());
    let stored = project(UserId::new(), "Estufa", &clock);
    db.rt.block_on(repo.insert(&stored)).expect("first insert");

    let result = db.rt.block_on(repo.insert(&stored));

    assert!(
        matches!(result, Err(ProjectRepositoryError::DuplicateProject(id)) if id == stored.id()),
        "expected DuplicateProject, got: {result:?}"
    );
}
