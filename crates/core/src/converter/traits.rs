//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::PathBuf;

use super::error::ConverterError;
use crate::pipeline::PipelineStep;

/// Runs one pipeline step through an external tool.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Returns the name of this invoker implementation.
    fn name(&self) -> &str;

    /// Runs the step and returns the path of the file it produced.
    ///
    /// Blocks the calling task until the tool exits. Never retries.
    async fn invoke(&self, step: &PipelineStep) -> Result<PathBuf, ConverterError>;
}

/// Answers whether the external tool can be found.
pub trait ToolProbe: Send + Sync {
    fn is_available(&self) -> bool;
}
