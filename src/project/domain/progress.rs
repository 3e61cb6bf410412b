//! Completion progress derived from a project's tasks.

use serde::{Deserialize, Serialize};

/// Count of finished tasks over all tasks, with a whole-number percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectProgress {
    total: usize,
    completed: usize,
}

impl ProjectProgress {
    /// Creates progress from raw counts.
    ///
    /// `completed` is clamped to `total`.
    #[must_use]
    pub fn new(total: usize, completed: usize) -> Self {
        Self {
            total,
            completed: completed.min(total),
        }
    }

    /// Counts tasks, treating those for which `is_done` holds as completed.
    #[must_use]
    pub fn tally<I, T>(tasks: I, is_done: impl Fn(&T) -> bool) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let (total, completed) = tasks.into_iter().fold((0, 0), |(total, done), task| {
            (total + 1, done + usize::from(is_done(&task)))
        });
        Self { total, completed }
    }

    /// Returns the number of tasks.
    #[must_use]
    pub const fn total(self) -> usize {
        self.total
    }

    /// Returns the number of completed tasks.
    #[must_use]
    pub const fn completed(self) -> usize {
        self.completed
    }

    /// Returns completed / total as a percentage rounded half-up; 0 without
    /// tasks.
    #[must_use]
    #[expect(
        clippy::integer_division,
        reason = "progress is reported in whole percent, rounded half-up"
    )]
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let rounded = (self.completed * 200 + self.total) / (self.total * 2);
        u8::try_from(rounded.min(100)).unwrap_or(100)
    }
}
