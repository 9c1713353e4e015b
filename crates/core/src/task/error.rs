//! Error types for the task module.

use thiserror::Error;

use super::types::{TaskId, TaskStatus};

/// Errors returned by the task registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// No task with this identifier exists.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// A task with this identifier already exists.
    #[error("Task already exists: {0}")]
    DuplicateTask(TaskId),

    /// The task already reached a terminal state.
    #[error("Task {id} is already {status}")]
    TerminalState { id: TaskId, status: TaskStatus },
}
