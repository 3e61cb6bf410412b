//! Application services for the project task board.

mod board;

pub use board::{TaskBoardError, TaskBoardResult, TaskBoardService, TaskRequest};
