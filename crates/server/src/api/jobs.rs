//! Job submission and status handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use transcoder_core::{SubmissionError, TaskError, TaskId, TaskStatus, Upload};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub task_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub task_id: String,
    pub status: TaskStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobNotFoundResponse {
    pub status: String,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/jobs
///
/// Multipart upload with a `file` part and an `operation` field.
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitJobResponse>), ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut operation: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(api_error(e.status(), e.body_text())),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((filename, bytes.to_vec())),
                    Err(e) => return Err(api_error(e.status(), e.body_text())),
                }
            }
            "operation" => match field.text().await {
                Ok(text) => operation = Some(text),
                Err(e) => return Err(api_error(e.status(), e.body_text())),
            },
            _ => {}
        }
    }

    let Some((filename, data)) = file else {
        return Err(api_error(StatusCode::BAD_REQUEST, "No file part"));
    };

    let upload = Upload {
        filename,
        data,
        operation,
    };

    match state.gateway().submit(upload).await {
        Ok(task_id) => Ok((
            StatusCode::ACCEPTED,
            Json(SubmitJobResponse {
                task_id: task_id.to_string(),
                message: "Processing started".to_string(),
            }),
        )),
        Err(e) => Err(submission_error(e)),
    }
}

fn submission_error(e: SubmissionError) -> ApiError {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if matches!(e, SubmissionError::ToolUnavailable) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        error!(error = %e, "Submission failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    api_error(status, e.to_string())
}

/// GET /api/v1/jobs/{task_id}
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Response {
    match state.registry().get(&TaskId::new(task_id)).await {
        Ok(task) => Json(JobStatusResponse {
            task_id: task.id.to_string(),
            status: task.status,
            message: task.message,
            output_file: task.output_path.map(|p| p.display().to_string()),
        })
        .into_response(),
        Err(TaskError::TaskNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(JobNotFoundResponse {
                status: "not_found".to_string(),
                message: "Task not found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
