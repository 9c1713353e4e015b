//! Job runner implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::error::RunError;
use super::observer::{finished_message, started_message, StepObserver};
use crate::converter::ToolInvoker;
use crate::metrics::{STEPS_TOTAL, STEP_DURATION, TASKS_FINISHED};
use crate::pipeline::{self, OutputLayout, PipelinePlan, PipelineStep};
use crate::task::{TaskId, TaskRegistry, TaskStatus};

/// Runs a plan step by step in order.
///
/// Stops at the first failing step. Intermediate files already written are
/// left in place. Returns the final artifact path.
pub async fn execute_plan(
    invoker: &dyn ToolInvoker,
    plan: &PipelinePlan,
    observer: &dyn StepObserver,
) -> Result<PathBuf, RunError> {
    let total = plan.len();
    let mut last_output = None;

    for (index, step) in plan.steps().iter().enumerate() {
        observer.step_started(index, total, step).await;

        let start = Instant::now();
        let result = invoker.invoke(step).await;
        let kind = step.kind.as_str();
        STEP_DURATION
            .with_label_values(&[kind])
            .observe(start.elapsed().as_secs_f64());

        match result {
            Ok(output) => {
                STEPS_TOTAL.with_label_values(&[kind, "success"]).inc();
                observer.step_finished(index, total, step, &output).await;
                last_output = Some(output);
            }
            Err(source) => {
                STEPS_TOTAL.with_label_values(&[kind, source.kind()]).inc();
                return Err(RunError::StepFailed {
                    step: step.kind,
                    source,
                });
            }
        }
    }

    last_output.ok_or(RunError::EmptyPlan)
}

/// Executes planned pipelines for submitted tasks and records their progress.
///
/// Each task runs on its own tokio task. Only the runner that owns a task
/// writes to its registry entry.
pub struct JobRunner {
    registry: Arc<TaskRegistry>,
    invoker: Arc<dyn ToolInvoker>,
    layout: OutputLayout,
}

impl JobRunner {
    pub fn new(
        registry: Arc<TaskRegistry>,
        invoker: Arc<dyn ToolInvoker>,
        layout: OutputLayout,
    ) -> Self {
        Self {
            registry,
            invoker,
            layout,
        }
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Starts the task in the background.
    ///
    /// Callers may drop the returned handle; the job keeps running. There is
    /// no way to cancel a job once spawned.
    pub fn spawn(
        self: &Arc<Self>,
        task_id: TaskId,
        input: PathBuf,
        operation: String,
    ) -> JoinHandle<()> {
        let runner = Arc::clone(self);
        tokio::spawn(async move {
            runner.run(&task_id, &input, &operation).await;
        })
    }

    /// Runs the task to a terminal state. Failures end up in the registry.
    pub async fn run(&self, task_id: &TaskId, input: &Path, operation: &str) {
        info!(task_id = %task_id, input = %input.display(), operation, "Starting job");
        self.record(task_id, TaskStatus::Processing, "starting pipeline", None)
            .await;

        let plan = match pipeline::plan(&self.layout, input, operation) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "Planning failed");
                self.finish(task_id, TaskStatus::Error, e.to_string(), None)
                    .await;
                return;
            }
        };

        let observer = RegistryObserver {
            registry: &self.registry,
            task_id,
        };

        match execute_plan(self.invoker.as_ref(), &plan, &observer).await {
            Ok(output) => {
                let message = plan
                    .steps()
                    .last()
                    .map(|s| s.kind.completion_message())
                    .unwrap_or("Processing complete.");
                info!(task_id = %task_id, output = %output.display(), "Job completed");
                self.finish(task_id, TaskStatus::Completed, message, Some(output))
                    .await;
            }
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "Job failed");
                self.finish(task_id, TaskStatus::Error, e.to_string(), None)
                    .await;
            }
        }
    }

    async fn finish(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        message: impl Into<String>,
        output_path: Option<PathBuf>,
    ) {
        TASKS_FINISHED.with_label_values(&[status.as_str()]).inc();
        self.record(task_id, status, message, output_path).await;
    }

    async fn record(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        message: impl Into<String>,
        output_path: Option<PathBuf>,
    ) {
        if let Err(e) = self
            .registry
            .update(task_id, status, message, output_path)
            .await
        {
            error!(task_id = %task_id, error = %e, "Failed to record task state");
        }
    }
}

/// Publishes step progress into the registry entry of one task.
struct RegistryObserver<'a> {
    registry: &'a TaskRegistry,
    task_id: &'a TaskId,
}

#[async_trait]
impl StepObserver for RegistryObserver<'_> {
    async fn step_started(&self, index: usize, total: usize, step: &PipelineStep) {
        let message = started_message(index, total, step);
        if let Err(e) = self
            .registry
            .update(self.task_id, TaskStatus::Processing, message, None)
            .await
        {
            error!(task_id = %self.task_id, error = %e, "Failed to record step start");
        }
    }

    async fn step_finished(&self, index: usize, total: usize, step: &PipelineStep, _output: &Path) {
        let message = finished_message(index, total, step);
        if let Err(e) = self
            .registry
            .update(self.task_id, TaskStatus::Processing, message, None)
            .await
        {
            error!(task_id = %self.task_id, error = %e, "Failed to record step completion");
        }
    }
}
