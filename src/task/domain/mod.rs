//! Domain model for tasks and the status board.

mod board;
mod drag;
mod error;
mod ids;
mod priority;
mod status;
mod task;

pub use board::StatusBoard;
pub use drag::{DragEnd, DragNoOp, DragResolution, DropSignal, DropTarget, resolve_drag};
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use priority::TaskPriority;
pub use status::{Locale, TaskStatus};
pub use task::{PersistedTaskData, StatusChange, Task, TaskDraft};
