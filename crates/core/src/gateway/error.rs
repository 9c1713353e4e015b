//! Error types for the gateway module.

use std::path::PathBuf;
use thiserror::Error;

use crate::task::TaskError;

/// Reasons a submission is rejected before processing starts.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("No selected file")]
    EmptyFilename,

    #[error("No operation specified")]
    MissingOperation,

    #[error("FFmpeg is not installed or not in PATH")]
    ToolUnavailable,

    #[error("Failed to store upload at {}: {source}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Task registry error: {0}")]
    Registry(#[from] TaskError),
}

impl SubmissionError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyFilename => "empty_filename",
            Self::MissingOperation => "missing_operation",
            Self::ToolUnavailable => "tool_unavailable",
            Self::Staging { .. } => "staging",
            Self::Registry(_) => "registry",
        }
    }

    /// Whether the submitter can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyFilename | Self::MissingOperation)
    }
}
