//! Task aggregate root and status changes.

use super::{TaskDomainError, TaskId, TaskPriority, TaskStatus};
use crate::project::domain::ProjectId;
use crate::session::domain::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize, Serializer};

/// Validated user input for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    name: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assigned_to_name: Option<String>,
}

impl TaskDraft {
    /// Creates a draft in the first column with medium priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyName`] when the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            description: None,
            status: TaskStatus::ToDo,
            priority: TaskPriority::default(),
            due_date: None,
            assigned_to_name: None,
        })
    }

    /// Sets the description; blank text clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    /// Sets the status column.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the assignee's display name; blank text clears it.
    #[must_use]
    pub fn with_assignee(mut self, name: impl Into<String>) -> Self {
        self.assigned_to_name = non_blank(name.into());
        self
    }

    /// Returns the status the draft asks for.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Completion timestamp for a task moving from `previous` to `next`.
///
/// Entering the terminal status stamps `now`; staying in it keeps `current`;
/// any other status clears it.
fn completion_for(
    previous: Option<TaskStatus>,
    next: TaskStatus,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (previous, next) {
        (Some(TaskStatus::Done), TaskStatus::Done) => current.or(Some(now)),
        (_, TaskStatus::Done) => Some(now),
        _ => None,
    }
}

/// Remote update payload for a status change.
///
/// Computed once and applied both to the local cache and to the remote row
/// so the two carry identical timestamps. Serializes to the row fields
/// written by the update, with the status as its storage label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// Task being moved.
    #[serde(skip)]
    pub task_id: TaskId,
    /// New status.
    #[serde(serialize_with = "serialize_status_label")]
    pub status: TaskStatus,
    /// Mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp, present exactly when `status` is terminal.
    pub completed_at: Option<DateTime<Utc>>,
}

fn serialize_status_label<S: Serializer>(
    status: &TaskStatus,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(status.as_str())
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    owner: UserId,
    name: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assigned_to_name: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning user.
    pub owner: UserId,
    /// Task name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Board column.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Assignee display name.
    pub assigned_to_name: Option<String>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in `project_id` owned by `owner`.
    #[must_use]
    pub fn create(
        owner: UserId,
        project_id: ProjectId,
        draft: TaskDraft,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id,
            owner,
            completed_at: completion_for(None, draft.status, None, timestamp),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            assigned_to_name: draft.assigned_to_name,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            owner: data.owner,
            name: data.name,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            assigned_to_name: data.assigned_to_name,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Replaces the editable fields from `draft`.
    ///
    /// A task that stays done keeps its original completion time.
    pub fn apply(&mut self, draft: TaskDraft, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.completed_at =
            completion_for(Some(self.status), draft.status, self.completed_at, timestamp);
        self.name = draft.name;
        self.description = draft.description;
        self.status = draft.status;
        self.priority = draft.priority;
        self.due_date = draft.due_date;
        self.assigned_to_name = draft.assigned_to_name;
        self.updated_at = timestamp;
    }

    /// Plans a move to `status` at `now`.
    ///
    /// Returns `None` when the task is already in `status`.
    #[must_use]
    pub fn plan_status_change(
        &self,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Option<StatusChange> {
        if self.status == status {
            return None;
        }
        Some(StatusChange {
            task_id: self.id,
            status,
            updated_at: now,
            completed_at: completion_for(Some(self.status), status, self.completed_at, now),
        })
    }

    /// Applies a planned status change.
    pub const fn apply_status_change(&mut self, change: &StatusChange) {
        self.status = change.status;
        self.updated_at = change.updated_at;
        self.completed_at = change.completed_at;
    }

    /// Moves the task to `status`, stamping times from `clock`.
    ///
    /// Returns the applied change, or `None` when the status is unchanged.
    pub fn change_status(
        &mut self,
        status: TaskStatus,
        clock: &impl Clock,
    ) -> Option<StatusChange> {
        let change = self.plan_status_change(status, clock.utc())?;
        self.apply_status_change(&change);
        Some(change)
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the board column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the assignee display name.
    #[must_use]
    pub fn assigned_to_name(&self) -> Option<&str> {
        self.assigned_to_name.as_deref()
    }

    /// Returns when the task was completed; set exactly while done.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
