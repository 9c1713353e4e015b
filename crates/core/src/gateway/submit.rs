//! Submission handling.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::error::SubmissionError;
use super::filename::sanitize_filename;
use crate::converter::ToolProbe;
use crate::metrics::{SUBMISSIONS_REJECTED, TASKS_SUBMITTED};
use crate::runner::JobRunner;
use crate::task::{TaskError, TaskId, TaskIdGenerator};

/// A file received from a client together with the requested operation.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Name as supplied by the client, before sanitization.
    pub filename: String,
    pub data: Vec<u8>,
    /// Operation label, e.g. "compress" or "extract_mp3".
    pub operation: Option<String>,
}

/// Entry point for new work.
pub struct SubmissionGateway {
    runner: Arc<JobRunner>,
    probe: Arc<dyn ToolProbe>,
    upload_dir: PathBuf,
    ids: TaskIdGenerator,
}

impl SubmissionGateway {
    pub fn new(
        runner: Arc<JobRunner>,
        probe: Arc<dyn ToolProbe>,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            probe,
            upload_dir: upload_dir.into(),
            ids: TaskIdGenerator::new(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Whether the external tool is currently usable.
    ///
    /// The probe touches the filesystem, so it runs on the blocking pool.
    pub async fn tool_available(&self) -> bool {
        let probe = Arc::clone(&self.probe);
        tokio::task::spawn_blocking(move || probe.is_available())
            .await
            .unwrap_or(false)
    }

    /// Validates and stages an upload, registers a task and starts its job.
    ///
    /// Returns as soon as the job is spawned. Rejections leave no task behind.
    pub async fn submit(&self, upload: Upload) -> Result<TaskId, SubmissionError> {
        let result = self.accept(upload).await;
        match &result {
            Ok(_) => TASKS_SUBMITTED.inc(),
            Err(e) => SUBMISSIONS_REJECTED.with_label_values(&[e.reason()]).inc(),
        }
        result
    }

    async fn accept(&self, upload: Upload) -> Result<TaskId, SubmissionError> {
        let filename = sanitize_filename(&upload.filename).ok_or(SubmissionError::EmptyFilename)?;

        let operation = upload
            .operation
            .map(|op| op.trim().to_string())
            .filter(|op| !op.is_empty())
            .ok_or(SubmissionError::MissingOperation)?;

        if !self.tool_available().await {
            warn!(filename = %filename, "Rejecting submission, ffmpeg unavailable");
            return Err(SubmissionError::ToolUnavailable);
        }

        let input = self.stage(&filename, &upload.data).await?;

        let task_id = self.ids.next_id();
        if let Err(e) = self.runner.registry().create(task_id.clone()).await {
            if let TaskError::DuplicateTask(_) = &e {
                error!(task_id = %task_id, "Generated task id already registered");
            }
            return Err(e.into());
        }

        info!(
            task_id = %task_id,
            input = %input.display(),
            operation = %operation,
            "Task submitted"
        );
        self.runner.spawn(task_id.clone(), input, operation);

        Ok(task_id)
    }

    async fn stage(&self, filename: &str, data: &[u8]) -> Result<PathBuf, SubmissionError> {
        let staging_error = |path: &Path, source| SubmissionError::Staging {
            path: path.to_path_buf(),
            source,
        };

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| staging_error(&self.upload_dir, e))?;

        let path = self.upload_dir.join(filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| staging_error(&path, e))?;

        Ok(path)
    }
}
