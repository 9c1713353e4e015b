//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::PlanError;

/// Container format of an input file, derived from its extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaFormat {
    /// MPEG-4 Part 14, the canonical intermediate container.
    Mp4,
    /// Matroska
    Mkv,
    /// Audio Video Interleave
    Avi,
    /// QuickTime
    Mov,
    /// WebM
    Webm,
    /// Flash Video
    Flv,
    /// Windows Media Video
    Wmv,
    /// Any other extension (lowercased, without the dot).
    Other(String),
    /// The file has no extension.
    Unknown,
}

impl MediaFormat {
    /// Detects the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension() else {
            return Self::Unknown;
        };

        match ext.to_string_lossy().to_lowercase().as_str() {
            "mp4" => Self::Mp4,
            "mkv" => Self::Mkv,
            "avi" => Self::Avi,
            "mov" => Self::Mov,
            "webm" => Self::Webm,
            "flv" => Self::Flv,
            "wmv" => Self::Wmv,
            "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this is the canonical container that needs no conversion.
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Mp4)
    }
}

/// Operation requested by a client for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Re-encode the video to reduce its size.
    Compress,
    /// Extract the audio track as MP3.
    ExtractAudio,
}

impl Operation {
    /// Canonical label of this operation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::ExtractAudio => "extract_mp3",
        }
    }
}

impl FromStr for Operation {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compress" => Ok(Self::Compress),
            "extract_mp3" | "extract_audio" | "extract-audio" => Ok(Self::ExtractAudio),
            _ => Err(PlanError::UnsupportedOperation {
                operation: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Actions selected on the command line. Both may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actions {
    pub compress: bool,
    pub extract_audio: bool,
}

impl Actions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.compress && !self.extract_audio
    }
}

impl From<Operation> for Actions {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Compress => Self {
                compress: true,
                extract_audio: false,
            },
            Operation::ExtractAudio => Self {
                compress: false,
                extract_audio: true,
            },
        }
    }
}

/// Kind of a single external-tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Remux into the canonical container, copying video and re-encoding audio.
    ConvertContainer,
    /// Re-encode video and audio at fixed quality settings.
    Compress,
    /// Keep only the audio stream.
    ExtractAudio,
}

impl StepKind {
    /// Short identifier used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConvertContainer => "convert_container",
            Self::Compress => "compress",
            Self::ExtractAudio => "extract_audio",
        }
    }

    /// Noun used in failure messages ("Error during <noun>").
    pub fn noun(&self) -> &'static str {
        match self {
            Self::ConvertContainer => "conversion",
            Self::Compress => "compression",
            Self::ExtractAudio => "MP3 extraction",
        }
    }

    /// Message shown once the step has finished.
    pub fn completion_message(&self) -> &'static str {
        match self {
            Self::ConvertContainer => "Conversion to MP4 complete.",
            Self::Compress => "Compression complete.",
            Self::ExtractAudio => "MP3 extraction complete.",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single planned external-tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub kind: StepKind,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PipelineStep {
    /// File name of the step input, for progress messages.
    pub fn input_name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }

    /// Progress message shown while the step runs.
    pub fn progress_message(&self) -> String {
        match self.kind {
            StepKind::ConvertContainer => format!("Converting {} to MP4", self.input_name()),
            StepKind::Compress => format!("Compressing {}", self.input_name()),
            StepKind::ExtractAudio => format!("Extracting MP3 from {}", self.input_name()),
        }
    }
}

/// Ordered steps for one job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePlan {
    steps: Vec<PipelineStep>,
}

impl PipelinePlan {
    pub(crate) fn new(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// Output of the last step, i.e. the final artifact.
    pub fn final_output(&self) -> Option<&Path> {
        self.steps.last().map(|s| s.output.as_path())
    }
}
