//! Converter module for running external transcoding steps.
//!
//! This module provides the `ToolInvoker` trait and an FFmpeg implementation
//! that runs one pipeline step per call in a child process.
//!
//! # Features
//!
//! - Container conversion to MP4 (video copied, audio re-encoded to AAC)
//! - H.264 compression at fixed quality
//! - MP3 audio extraction
//! - PATH-based availability checks
//!
//! # Example
//!
//! ```ignore
//! use transcoder_core::converter::{FfmpegInvoker, ToolInvoker, PathToolProbe, ToolProbe};
//!
//! let probe = PathToolProbe::new("ffmpeg");
//! if !probe.is_available() {
//!     return Err(anyhow!("ffmpeg missing"));
//! }
//!
//! let invoker = FfmpegInvoker::with_defaults();
//! for step in plan.steps() {
//!     let output = invoker.invoke(step).await?;
//!     println!("wrote {}", output.display());
//! }
//! ```

mod availability;
mod config;
mod error;
mod ffmpeg;
mod traits;

pub use availability::{resolve_tool, resolve_tool_blocking, PathToolProbe};
pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegInvoker;
pub use traits::{ToolInvoker, ToolProbe};
