//! Drag-and-drop reassignment between status columns.
//!
//! A drag ends with the dragged card's identity and, optionally, the element
//! under the pointer. [`DropTarget::classify`] turns the latter into a tagged
//! target in one step; [`resolve_drag`] then decides the new status. Both are
//! pure functions of the task list and the signal.

use super::{Task, TaskId, TaskStatus};

/// Element under the pointer when a drag ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropSignal {
    id: String,
    container_id: Option<String>,
}

impl DropSignal {
    /// Creates a signal for the element with identity `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            container_id: None,
        }
    }

    /// Records the identity of the sortable container holding the element.
    #[must_use]
    pub fn with_container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    /// Returns the element identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the container identity, if the drag library supplied one.
    #[must_use]
    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }
}

/// End of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    active_id: String,
    over: Option<DropSignal>,
}

impl DragEnd {
    /// Creates a drag-end event.
    #[must_use]
    pub fn new(active_id: impl Into<String>, over: Option<DropSignal>) -> Self {
        Self {
            active_id: active_id.into(),
            over,
        }
    }

    /// Drag of `task` released over the element `over_id`.
    #[must_use]
    pub fn onto(task: TaskId, over_id: impl Into<String>) -> Self {
        Self::new(task.to_string(), Some(DropSignal::new(over_id)))
    }

    /// Drag of `task` released outside every drop zone.
    #[must_use]
    pub fn outside(task: TaskId) -> Self {
        Self::new(task.to_string(), None)
    }

    /// Returns the dragged element identity.
    #[must_use]
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Returns the element under the pointer, if any.
    #[must_use]
    pub const fn over(&self) -> Option<&DropSignal> {
        self.over.as_ref()
    }
}

/// Classified drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// A status column.
    Column(TaskStatus),
    /// Another card on the board.
    Task(TaskId),
    /// Nothing a task can be dropped on.
    Invalid,
}

impl DropTarget {
    /// Classifies the element under the pointer.
    ///
    /// First match wins: a status column identity, then the identity of a
    /// task in `tasks`, then a container identity naming a status column.
    /// The container tier depends on metadata the drag library may or may not
    /// supply and is best-effort.
    #[must_use]
    pub fn classify(tasks: &[Task], signal: Option<&DropSignal>) -> Self {
        let Some(signal) = signal else {
            return Self::Invalid;
        };
        if let Ok(status) = TaskStatus::try_from(signal.id()) {
            return Self::Column(status);
        }
        if let Some(task) = find_task(tasks, signal.id()) {
            return Self::Task(task.id());
        }
        signal
            .container_id()
            .and_then(|container| TaskStatus::try_from(container).ok())
            .map_or(Self::Invalid, Self::Column)
    }
}

/// Why a drag produced no status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNoOp {
    /// The dragged identity is not a task on this board.
    UnknownTask,
    /// The drop target is not a column or a task.
    InvalidTarget,
    /// The card was released on itself.
    DroppedInPlace,
    /// The target is the card's own column or a card in that column.
    SameColumn,
}

/// Outcome of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragResolution {
    /// Move `task_id` into `status`.
    Resolved {
        /// Dragged task.
        task_id: TaskId,
        /// Status before the drag.
        from: TaskStatus,
        /// Resolved status.
        status: TaskStatus,
    },
    /// Leave everything as it is.
    NoOp(DragNoOp),
}

/// Resolves the status a dragged task should move to.
///
/// Dropping on a column takes that column's status; dropping on another
/// task takes that task's status. Anything that would leave the status as it
/// is yields a no-op: releasing a card on itself, on its own column or on a
/// neighbour in that column. So does a drop outside every target or a drag
/// of something that is not a task.
#[must_use]
pub fn resolve_drag(tasks: &[Task], drag: &DragEnd) -> DragResolution {
    let Some(active) = find_task(tasks, drag.active_id()) else {
        return DragResolution::NoOp(DragNoOp::UnknownTask);
    };
    let target = DropTarget::classify(tasks, drag.over());
    let status = match target {
        DropTarget::Column(status) => status,
        DropTarget::Task(id) => match tasks.iter().find(|task| task.id() == id) {
            Some(task) => task.status(),
            None => return DragResolution::NoOp(DragNoOp::InvalidTarget),
        },
        DropTarget::Invalid => return DragResolution::NoOp(DragNoOp::InvalidTarget),
    };
    if target == DropTarget::Task(active.id()) {
        return DragResolution::NoOp(DragNoOp::DroppedInPlace);
    }
    if status == active.status() {
        return DragResolution::NoOp(DragNoOp::SameColumn);
    }
    DragResolution::Resolved {
        task_id: active.id(),
        from: active.status(),
        status,
    }
}

fn find_task<'a>(tasks: &'a [Task], raw_id: &str) -> Option<&'a Task> {
    let id: TaskId = raw_id.parse().ok()?;
    tasks.iter().find(|task| task.id() == id)
}
