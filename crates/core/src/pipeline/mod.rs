//! Pipeline planning.
//!
//! Maps an input file and a requested operation to the ordered list of
//! external-tool steps needed to satisfy it:
//!
//! - MP4 input: a single compress or extract step
//! - any other container: convert to MP4 first, then compress or extract
//!
//! # Example
//!
//! ```ignore
//! use transcoder_core::pipeline::{plan, OutputLayout, StepKind};
//!
//! let layout = OutputLayout::new("output");
//! let plan = plan(&layout, Path::new("uploads/movie.mkv"), "compress")?;
//! assert_eq!(plan.kinds(), vec![StepKind::ConvertContainer, StepKind::Compress]);
//! ```

mod error;
mod layout;
mod planner;
mod types;

pub use error::PlanError;
pub use layout::{
    OutputLayout, AUDIO_DIR, AUDIO_EXTENSION, COMPRESSED_DIR, COMPRESSED_SUFFIX, VIDEO_DIR,
    VIDEO_EXTENSION,
};
pub use planner::{plan, plan_actions, plan_for};
pub use types::{Actions, MediaFormat, Operation, PipelinePlan, PipelineStep, StepKind};
