//! Step progress callbacks.

use async_trait::async_trait;
use std::path::Path;

use crate::pipeline::PipelineStep;

/// Receives progress callbacks while a plan executes.
///
/// `index` is zero-based; `total` is the number of steps in the plan.
#[async_trait]
pub trait StepObserver: Send + Sync {
    async fn step_started(&self, _index: usize, _total: usize, _step: &PipelineStep) {}

    async fn step_finished(
        &self,
        _index: usize,
        _total: usize,
        _step: &PipelineStep,
        _output: &Path,
    ) {
    }
}

/// Observer that ignores all callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl StepObserver for SilentObserver {}

/// Message reported while a step runs, e.g. "Compressing a.mp4 (step 2/2)...".
pub fn started_message(index: usize, total: usize, step: &PipelineStep) -> String {
    format!(
        "{} (step {}/{})...",
        step.progress_message(),
        index + 1,
        total
    )
}

/// Message reported once a step is done, e.g. "Compression complete (step 2/2)".
pub fn finished_message(index: usize, total: usize, step: &PipelineStep) -> String {
    format!(
        "{} (step {}/{})",
        step.kind.completion_message().trim_end_matches('.'),
        index + 1,
        total
    )
}
