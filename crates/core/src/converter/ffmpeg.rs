//! FFmpeg-based invoker implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, warn};

use super::availability::resolve_tool_blocking;
use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::ToolInvoker;
use crate::pipeline::{PipelineStep, StepKind};

/// Video codec used for compression (H.264).
const COMPRESS_VIDEO_CODEC: &str = "libx264";
/// Constant Rate Factor for compression (lower = better, 23 is the x264 default).
const COMPRESS_CRF: &str = "23";
/// Encoding speed vs compression ratio.
const COMPRESS_PRESET: &str = "medium";
/// Audio codec compatible with the MP4 container.
const AUDIO_CODEC: &str = "aac";
/// Audio bitrate for compressed output.
const COMPRESS_AUDIO_BITRATE: &str = "128k";
/// Number of trailing output lines kept as failure diagnostics.
const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// FFmpeg-based invoker implementation.
pub struct FfmpegInvoker {
    config: ConverterConfig,
}

impl FfmpegInvoker {
    /// Creates a new FFmpeg invoker with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates an invoker with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds the ffmpeg argument list for a step.
    fn build_args(&self, step: &PipelineStep) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            step.input.to_string_lossy().to_string(),
        ];

        match step.kind {
            StepKind::ConvertContainer => {
                args.extend(
                    [
                        "-c:v",
                        "copy",
                        "-c:a",
                        AUDIO_CODEC,
                        "-strict",
                        "experimental",
                    ]
                    .map(String::from),
                );
            }
            StepKind::Compress => {
                args.extend(
                    [
                        "-c:v",
                        COMPRESS_VIDEO_CODEC,
                        "-crf",
                        COMPRESS_CRF,
                        "-preset",
                        COMPRESS_PRESET,
                        "-c:a",
                        AUDIO_CODEC,
                        "-b:a",
                        COMPRESS_AUDIO_BITRATE,
                    ]
                    .map(String::from),
                );
            }
            StepKind::ExtractAudio => {
                // Best VBR quality, audio streams only
                args.extend(["-q:a", "0", "-map", "a"].map(String::from));
            }
        }

        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ]);

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(step.output.to_string_lossy().to_string());

        args
    }

    /// Ensures the parent directory of `output` exists.
    async fn ensure_output_dir(output: &Path) -> Result<(), ConverterError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|source| {
                ConverterError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

/// Keeps the last non-empty lines of the captured output.
fn tail_diagnostics(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stdout = String::from_utf8_lossy(stdout);
    let lines: Vec<&str> = stderr
        .lines()
        .chain(stdout.lines())
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let start = lines.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl ToolInvoker for FfmpegInvoker {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn invoke(&self, step: &PipelineStep) -> Result<PathBuf, ConverterError> {
        let program = resolve_tool_blocking(&self.config.ffmpeg_path).await?;

        Self::ensure_output_dir(&step.output).await?;

        let args = self.build_args(step);
        debug!(step = %step.kind, program = %program.display(), ?args, "Running ffmpeg");

        let start = Instant::now();
        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::ToolUnavailable {
                        tool: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        if !output.status.success() {
            let diagnostics = tail_diagnostics(&output.stderr, &output.stdout);
            warn!(
                step = %step.kind,
                exit_code = ?output.status.code(),
                "ffmpeg failed"
            );
            return Err(ConverterError::execution_failed(
                output.status.code(),
                diagnostics,
            ));
        }

        debug!(
            step = %step.kind,
            output = %step.output.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "ffmpeg finished"
        );

        Ok(step.output.clone())
    }
}
