//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while invoking the external tool.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The tool binary cannot be resolved on the search path.
    #[error("{} is not installed or not in PATH", tool.display())]
    ToolUnavailable { tool: PathBuf },

    /// The tool exited with a non-zero status.
    #[error("{}", describe_failure(*exit_code, diagnostics))]
    ToolExecutionFailed {
        exit_code: Option<i32>,
        diagnostics: String,
    },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {}", path.display())]
    OutputDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while spawning or waiting for the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_failure(exit_code: Option<i32>, diagnostics: &str) -> String {
    let status = match exit_code {
        Some(code) => format!("ffmpeg exited with code {code}"),
        None => "ffmpeg was terminated by a signal".to_string(),
    };
    if diagnostics.is_empty() {
        status
    } else {
        format!("{status}: {diagnostics}")
    }
}

impl ConverterError {
    /// Creates a new execution failure.
    pub fn execution_failed(exit_code: Option<i32>, diagnostics: impl Into<String>) -> Self {
        Self::ToolExecutionFailed {
            exit_code,
            diagnostics: diagnostics.into(),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToolUnavailable { .. } => "tool_unavailable",
            Self::ToolExecutionFailed { .. } => "tool_execution_failed",
            Self::OutputDirectoryFailed { .. } => "output_directory_failed",
            Self::Io(_) => "io",
        }
    }
}
