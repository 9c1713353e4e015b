//! Artifact listing and download handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;
use transcoder_core::{Artifact, ArtifactError};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

/// GET /api/v1/artifacts
pub async fn list_artifacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Artifact>>, ApiError> {
    let layout = state.layout().clone();
    tokio::task::spawn_blocking(move || transcoder_core::list_artifacts(&layout))
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, "Artifact listing panicked");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list artifacts")
        })
}

/// GET /api/v1/artifacts/{*path}
///
/// Serves a produced file as an attachment.
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let file = transcoder_core::resolve_artifact(state.layout(), &path).map_err(|e| match e {
        ArtifactError::InvalidPath(_) => api_error(StatusCode::BAD_REQUEST, e.to_string()),
        ArtifactError::NotFound(_) => api_error(StatusCode::NOT_FOUND, e.to_string()),
    })?;

    let data = tokio::fs::read(&file).await.map_err(|e| {
        error!(path = %file.display(), error = %e, "Failed to read artifact");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read artifact")
    })?;

    let content_type = match file.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("mp4") => "video/mp4",
        Some(ext) if ext.eq_ignore_ascii_case("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    };
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', ""))
        .unwrap_or_default();

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        data,
    ))
}
