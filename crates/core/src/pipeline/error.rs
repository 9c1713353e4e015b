//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while planning a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The requested operation is not recognised.
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    /// The input is already in the canonical container and no action was requested.
    #[error("Input file {} is already MP4 and no action was requested", path.display())]
    NothingToDo { path: PathBuf },
}
