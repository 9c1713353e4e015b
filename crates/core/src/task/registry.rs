//! In-memory task registry.

use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::TaskError;
use super::types::{Task, TaskId, TaskStatus};

/// Concurrency-safe store of task state, keyed by task id.
///
/// Lives for the lifetime of the process. Entries are never evicted.
/// Each task has a single writer (its job runner); any number of readers may
/// poll concurrently. Locks are held only for the map access itself.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new task in the `queued` state.
    pub async fn create(&self, id: TaskId) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&id) {
            return Err(TaskError::DuplicateTask(id));
        }

        let task = Task::queued(id.clone());
        tasks.insert(id, task.clone());
        Ok(task)
    }

    /// Overwrites the mutable fields of a task.
    ///
    /// Refuses to touch tasks that already reached a terminal state.
    pub async fn update(
        &self,
        id: &TaskId,
        status: TaskStatus,
        message: impl Into<String>,
        output_path: Option<PathBuf>,
    ) -> Result<Task, TaskError> {
        let message = message.into();
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;

        if task.status.is_terminal() {
            return Err(TaskError::TerminalState {
                id: id.clone(),
                status: task.status,
            });
        }

        debug!(task_id = %id, %status, %message, "Task updated");
        task.status = status;
        task.message = message;
        task.output_path = output_path;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    /// Returns a snapshot of a task.
    pub async fn get(&self, id: &TaskId) -> Result<Task, TaskError> {
        self.tasks
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| TaskError::TaskNotFound(id.clone()))
    }

    /// Returns snapshots of all tasks, oldest first.
    pub async fn list(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        tasks
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    /// Number of tasks in each status. Every status is present.
    pub async fn count_by_status(&self) -> HashMap<TaskStatus, usize> {
        let mut counts: HashMap<TaskStatus, usize> =
            TaskStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for task in self.tasks.read().await.values() {
            *counts.entry(task.status).or_default() += 1;
        }
        counts
    }
}
