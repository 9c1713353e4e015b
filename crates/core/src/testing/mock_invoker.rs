//! Mock tool invoker for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConverterError, ToolInvoker};
use crate::pipeline::{PipelineStep, StepKind};

/// Mock implementation of the ToolInvoker trait.
///
/// Provides controllable behavior for testing:
/// - Track invoked steps for assertions
/// - Fail every step of a given kind
/// - Simulate step duration
/// - Optionally write placeholder output files
///
/// Clones share state, so a test can keep a handle after passing the mock to
/// a runner.
///
/// # Example
///
/// ```rust,ignore
/// use transcoder_core::testing::MockInvoker;
///
/// let invoker = MockInvoker::new();
/// invoker
///     .fail_on(StepKind::Compress, ConverterError::execution_failed(Some(1), "boom"))
///     .await;
///
/// let runner = JobRunner::new(registry, Arc::new(invoker.clone()), layout);
/// // ...
/// assert_eq!(invoker.step_count().await, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockInvoker {
    /// Steps invoked so far, in order.
    steps: Arc<RwLock<Vec<PipelineStep>>>,
    /// Failures configured per step kind.
    failures: Arc<RwLock<HashMap<StepKind, ConverterError>>>,
    /// Simulated step duration.
    delay: Arc<RwLock<Duration>>,
    /// Whether successful steps write a placeholder output file.
    materialize: Arc<RwLock<bool>>,
}

impl MockInvoker {
    /// Create a new mock invoker where every step succeeds instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded steps.
    pub async fn recorded_steps(&self) -> Vec<PipelineStep> {
        self.steps.read().await.clone()
    }

    /// Get the number of steps invoked.
    pub async fn step_count(&self) -> usize {
        self.steps.read().await.len()
    }

    /// Make every step of `kind` fail with `error`.
    pub async fn fail_on(&self, kind: StepKind, error: ConverterError) {
        self.failures.write().await.insert(kind, error);
    }

    /// Remove all configured failures.
    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    /// Set the simulated step duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Write a small placeholder file at each successful step's output path.
    pub async fn set_materialize_outputs(&self, materialize: bool) {
        *self.materialize.write().await = materialize;
    }

    async fn failure_for(&self, kind: StepKind) -> Option<ConverterError> {
        self.failures.read().await.get(&kind).map(duplicate_error)
    }
}

/// ConverterError holds an io::Error and is not Clone.
fn duplicate_error(error: &ConverterError) -> ConverterError {
    match error {
        ConverterError::ToolUnavailable { tool } => ConverterError::ToolUnavailable { tool: tool.clone() },
        ConverterError::ToolExecutionFailed {
            exit_code,
            diagnostics,
        } => ConverterError::execution_failed(*exit_code, diagnostics.clone()),
        ConverterError::OutputDirectoryFailed { path, source } => {
            ConverterError::OutputDirectoryFailed {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            }
        }
        ConverterError::Io(source) => {
            ConverterError::Io(std::io::Error::new(source.kind(), source.to_string()))
        }
    }
}

#[async_trait]
impl ToolInvoker for MockInvoker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, step: &PipelineStep) -> Result<PathBuf, ConverterError> {
        self.steps.write().await.push(step.clone());

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.failure_for(step.kind).await {
            return Err(err);
        }

        if *self.materialize.read().await {
            if let Some(parent) = step.output.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&step.output, step.kind.as_str()).await?;
        }

        Ok(step.output.clone())
    }
}
