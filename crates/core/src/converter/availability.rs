//! External tool detection.

use std::path::{Path, PathBuf};

use super::error::ConverterError;
use super::traits::ToolProbe;

/// Resolves a tool name or path against PATH.
pub fn resolve_tool(tool: &Path) -> Result<PathBuf, ConverterError> {
    which::which(tool).map_err(|_| ConverterError::ToolUnavailable {
        tool: tool.to_path_buf(),
    })
}

/// [`resolve_tool`] run on the blocking pool.
pub async fn resolve_tool_blocking(tool: &Path) -> Result<PathBuf, ConverterError> {
    let lookup = tool.to_path_buf();
    tokio::task::spawn_blocking(move || resolve_tool(&lookup))
        .await
        .unwrap_or_else(|_| {
            Err(ConverterError::ToolUnavailable {
                tool: tool.to_path_buf(),
            })
        })
}

/// Availability check backed by a PATH lookup.
#[derive(Debug, Clone)]
pub struct PathToolProbe {
    tool: PathBuf,
}

impl PathToolProbe {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }
}

impl ToolProbe for PathToolProbe {
    fn is_available(&self) -> bool {
        resolve_tool(&self.tool).is_ok()
    }
}
