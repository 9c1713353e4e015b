//! Produced artifacts under the output root.
//!
//! Read-only helpers for browsing and downloading finished files. Job
//! execution never depends on this listing.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::pipeline::{OutputLayout, AUDIO_EXTENSION, VIDEO_EXTENSION};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Invalid artifact path: {0}")]
    InvalidPath(String),

    #[error("Artifact not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Video,
    Audio,
}

impl ArtifactKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if ext == VIDEO_EXTENSION {
            Some(Self::Video)
        } else if ext == AUDIO_EXTENSION {
            Some(Self::Audio)
        } else {
            None
        }
    }
}

/// A produced file, addressed relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    /// Forward-slash separated path below the output root.
    pub relative_path: String,
    pub size_bytes: u64,
    pub kind: ArtifactKind,
}

/// Lists `.mp4` and `.mp3` files below the output root, sorted by path.
///
/// A missing output root yields an empty list.
pub fn list_artifacts(layout: &OutputLayout) -> Vec<Artifact> {
    let root = layout.root();
    let mut artifacts: Vec<Artifact> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let kind = ArtifactKind::from_path(entry.path())?;
            let relative = entry.path().strip_prefix(root).ok()?;
            let size_bytes = entry.metadata().ok()?.len();
            Some(Artifact {
                name: entry.file_name().to_string_lossy().into_owned(),
                relative_path: to_slash_path(relative),
                size_bytes,
                kind,
            })
        })
        .collect();

    artifacts.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    artifacts
}

/// Maps a client-supplied relative path to a file under the output root.
///
/// Absolute paths and any `..` component are refused.
pub fn resolve_artifact(layout: &OutputLayout, relative: &str) -> Result<PathBuf, ArtifactError> {
    let candidate = Path::new(relative);
    if relative.is_empty() {
        return Err(ArtifactError::InvalidPath(relative.to_string()));
    }

    for component in candidate.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArtifactError::InvalidPath(relative.to_string()));
            }
        }
    }

    let path = layout.root().join(candidate);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ArtifactError::NotFound(relative.to_string()))
    }
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
