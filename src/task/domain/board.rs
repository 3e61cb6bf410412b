//! Status board: tasks grouped into status columns.

use super::{Task, TaskId, TaskStatus};
use crate::project::domain::ProjectProgress;
use std::collections::BTreeMap;

/// Tasks partitioned by status, one column per [`TaskStatus`].
///
/// Every status has a column, possibly empty, and every task sits in exactly
/// one column. Within a column tasks keep the order of the input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    columns: BTreeMap<TaskStatus, Vec<Task>>,
}

impl StatusBoard {
    /// Builds the board from an ordered task sequence.
    #[must_use]
    pub fn partition(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns: BTreeMap<TaskStatus, Vec<Task>> = TaskStatus::ALL
            .into_iter()
            .map(|status| (status, Vec::new()))
            .collect();
        for task in tasks {
            columns.entry(task.status()).or_default().push(task);
        }
        Self { columns }
    }

    /// Builds the board from borrowed tasks.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        Self::partition(tasks.into_iter().cloned())
    }

    /// Returns the tasks in `status`, in input order.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns.get(&status).map_or(&[], Vec::as_slice)
    }

    /// Iterates columns in board order.
    pub fn columns(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        self.columns
            .iter()
            .map(|(status, tasks)| (*status, tasks.as_slice()))
    }

    /// Returns the number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Returns `true` when the board holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.values().all(Vec::is_empty)
    }

    /// Returns the column and position of a task.
    #[must_use]
    pub fn locate(&self, id: TaskId) -> Option<(TaskStatus, usize)> {
        self.columns.iter().find_map(|(status, tasks)| {
            tasks
                .iter()
                .position(|task| task.id() == id)
                .map(|index| (*status, index))
        })
    }

    /// Returns completion progress over the whole board.
    #[must_use]
    pub fn progress(&self) -> ProjectProgress {
        ProjectProgress::new(self.len(), self.column(TaskStatus::Done).len())
    }

    /// Flattens the board back into a list, column by column.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.columns.into_values().flatten().collect()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::partition(Vec::new())
    }
}
