//! Output directory layout.
//!
//! Artifacts land under a fixed root with one subdirectory per artifact kind:
//!
//! ```text
//! <root>/mp4/                 converted containers  (<stem>.mp4)
//! <root>/mp4/compressed/      compressed videos     (<stem>_compressed.mp4)
//! <root>/mp3/                 extracted audio       (<stem>.mp3)
//! ```
//!
//! Names depend only on the step input and the step kind, so resubmitting the
//! same file with the same operation overwrites the previous artifact.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::types::StepKind;

pub const VIDEO_DIR: &str = "mp4";
pub const COMPRESSED_DIR: &str = "compressed";
pub const AUDIO_DIR: &str = "mp3";

pub const VIDEO_EXTENSION: &str = "mp4";
pub const AUDIO_EXTENSION: &str = "mp3";
pub const COMPRESSED_SUFFIX: &str = "_compressed";

/// Maps step kinds to output locations under a root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for canonical-container output.
    pub fn video_dir(&self) -> PathBuf {
        self.root.join(VIDEO_DIR)
    }

    /// Directory for compressed output.
    pub fn compressed_dir(&self) -> PathBuf {
        self.root.join(VIDEO_DIR).join(COMPRESSED_DIR)
    }

    /// Directory for extracted audio.
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join(AUDIO_DIR)
    }

    pub fn dir_for(&self, kind: StepKind) -> PathBuf {
        match kind {
            StepKind::ConvertContainer => self.video_dir(),
            StepKind::Compress => self.compressed_dir(),
            StepKind::ExtractAudio => self.audio_dir(),
        }
    }

    /// Output path for running `kind` on `input`.
    pub fn output_for(&self, kind: StepKind, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        let file_name = match kind {
            StepKind::ConvertContainer => format!("{stem}.{VIDEO_EXTENSION}"),
            StepKind::Compress => format!("{stem}{COMPRESSED_SUFFIX}.{VIDEO_EXTENSION}"),
            StepKind::ExtractAudio => format!("{stem}.{AUDIO_EXTENSION}"),
        };

        self.dir_for(kind).join(file_name)
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new("output")
    }
}
