//! Task status columns and their display labels.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language used for user-facing labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Brazilian Portuguese, the storage language.
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// English.
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// Returns the BCP 47 tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board column a task sits in.
///
/// The set is closed and ordered; [`TaskStatus::ALL`] is the left-to-right
/// column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    ToDo,
    /// Being worked on.
    InProgress,
    /// Awaiting review.
    InReview,
    /// Finished. The only terminal status.
    Done,
}

impl TaskStatus {
    /// Every status in column order.
    pub const ALL: [Self; 4] = [Self::ToDo, Self::InProgress, Self::InReview, Self::Done];

    /// Returns the canonical storage representation.
    ///
    /// This is also the column identity used by drop targets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.label(Locale::PtBr)
    }

    /// Returns the snake-case key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::InReview => "in_review",
            Self::Done => "done",
        }
    }

    /// Returns the column heading in `locale`.
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::ToDo, Locale::PtBr) => "A Fazer",
            (Self::InProgress, Locale::PtBr) => "Em Andamento",
            (Self::InReview, Locale::PtBr) => "Em Revisão",
            (Self::Done, Locale::PtBr) => "Concluído",
            (Self::ToDo, Locale::En) => "To-Do",
            (Self::InProgress, Locale::En) => "In-Progress",
            (Self::InReview, Locale::En) => "In-Review",
            (Self::Done, Locale::En) => "Done",
        }
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }

    fn matches(self, normalized: &str) -> bool {
        normalized == self.key()
            || normalized == self.label(Locale::PtBr).to_lowercase()
            || normalized == self.label(Locale::En).to_lowercase()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Accepts storage labels, English labels, and snake-case keys,
    /// ignoring case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.matches(&normalized))
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}
